//! Site tree construction.
//!
//! The tree backbone follows discovery order only:
//!
//! ```text
//! index
//! ├── N_Shapes
//! │   ├── T_Shapes.Circle
//! │   │   ├── T_Shapes.Circle-constructors
//! │   │   │   └── C_Shapes.Circle.ctor
//! │   │   ├── T_Shapes.Circle-properties
//! │   │   │   └── P_Shapes.Circle.Radius
//! │   │   └── T_Shapes.Circle-methods
//! │   │       └── M_Shapes.Circle.Area
//! │   └── N_Shapes-extensions
//! │       └── M_Shapes.ShapeExtensions.Scale
//! └── N_Printing
//! ```
//!
//! Base types and interfaces never shape the tree, so cyclic type graphs
//! cannot produce cyclic navigation. Structurally empty nodes are omitted
//! rather than emitted as empty pages.

use refdoc_model::{Documentation, Parameter, TypeDef, TypeKind, TypeReference, short_name};

use crate::classify::{Classification, Classifier, ExtensionGroup, MemberRef, ViewedMember};
use crate::error::SiteError;
use crate::naming::{
    MemberKind, Slug, SlugRegistry, extensions_slug, group_slug, namespace_slug, type_slug,
};

/// Label of the global namespace.
pub const GLOBAL_NAMESPACE_LABEL: &str = "(global)";

/// Content of a node's page.
#[derive(Debug)]
pub enum Page<'a> {
    /// Documentation root listing namespaces.
    Root,
    /// Namespace listing its types.
    Namespace {
        /// Namespace name.
        name: &'a str,
        /// Declared types.
        types: &'a [TypeDef],
    },
    /// Extension methods of a namespace, grouped by extended type.
    ExtensionMethods {
        /// Namespace name.
        namespace: &'a str,
        /// Groups in declaration order.
        groups: Vec<ExtensionGroup<'a>>,
    },
    /// Type overview.
    Type {
        /// Documented type.
        ty: &'a TypeDef,
        /// Members and relationships.
        classification: Box<Classification<'a>>,
    },
    /// Members of one kind visible on a type.
    MemberGroup {
        /// Viewing type.
        ty: &'a TypeDef,
        /// Group kind.
        kind: MemberKind,
        /// Declared, inherited and extension members of the kind.
        members: Vec<ViewedMember<'a>>,
    },
    /// Single member.
    Member(ViewedMember<'a>),
}

/// Node of the navigation tree, owning zero or one page.
#[derive(Debug)]
pub struct SiteNode<'a> {
    /// Page identity.
    pub slug: Slug,
    /// Navigation label.
    pub label: String,
    /// Page content.
    pub page: Page<'a>,
    /// Child nodes in display order.
    pub children: Vec<SiteNode<'a>>,
}

impl<'a> SiteNode<'a> {
    fn new(slug: Slug, label: impl Into<String>, page: Page<'a>) -> Self {
        Self {
            slug,
            label: label.into(),
            page,
            children: Vec::new(),
        }
    }
}

/// A node visited by [`SiteTree::walk`] with its ancestors, root first.
#[derive(Debug)]
pub struct Visit<'t, 'a> {
    /// Visited node.
    pub node: &'t SiteNode<'a>,
    /// Ancestors from the root down to the parent.
    pub ancestors: Vec<&'t SiteNode<'a>>,
}

/// The complete site: every page with a unique slug.
#[derive(Debug)]
pub struct SiteTree<'a> {
    root: SiteNode<'a>,
    namespace_count: usize,
    type_count: usize,
}

impl<'a> SiteTree<'a> {
    /// Build the tree for the classified documented set.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NamingCollision`] if two nodes compute the same slug
    /// and [`SiteError::CaseCollision`] if two slugs differ only in case.
    pub fn build(classifier: &Classifier<'a>) -> Result<Self, SiteError> {
        TreeBuilder {
            classifier,
            doc: classifier.documentation(),
            registry: SlugRegistry::new(),
        }
        .build()
    }

    /// Root node.
    pub fn root(&self) -> &SiteNode<'a> {
        &self.root
    }

    /// Number of namespace nodes.
    pub fn namespace_count(&self) -> usize {
        self.namespace_count
    }

    /// Number of type nodes.
    pub fn type_count(&self) -> usize {
        self.type_count
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        fn count(node: &SiteNode<'_>) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Always false: the root page exists even for an empty set.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first pre-order traversal.
    ///
    /// Every consumer walks the tree through this method, so navigation and
    /// page emission see nodes in the same order.
    pub fn walk(&self) -> Vec<Visit<'_, 'a>> {
        fn visit<'t, 'a>(node: &'t SiteNode<'a>, path: &mut Vec<&'t SiteNode<'a>>, out: &mut Vec<Visit<'t, 'a>>) {
            out.push(Visit {
                node,
                ancestors: path.clone(),
            });
            path.push(node);
            for child in &node.children {
                visit(child, path, out);
            }
            path.pop();
        }

        let mut out = Vec::new();
        visit(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Find a node by slug.
    pub fn find(&self, slug: &str) -> Option<&SiteNode<'a>> {
        fn search<'t, 'a>(node: &'t SiteNode<'a>, slug: &str) -> Option<&'t SiteNode<'a>> {
            if node.slug.as_str() == slug {
                return Some(node);
            }
            node.children.iter().find_map(|child| search(child, slug))
        }
        search(&self.root, slug)
    }
}

struct TreeBuilder<'c, 'a> {
    classifier: &'c Classifier<'a>,
    doc: &'a Documentation,
    registry: SlugRegistry,
}

impl<'a> TreeBuilder<'_, 'a> {
    fn build(mut self) -> Result<SiteTree<'a>, SiteError> {
        let doc = self.doc;
        let classifier = self.classifier;
        let mut root = self.node(Slug::root(), "Home", Page::Root, "documentation root")?;
        let mut type_count = 0;

        for ns in doc.namespaces() {
            let label = if ns.name.is_empty() {
                GLOBAL_NAMESPACE_LABEL
            } else {
                ns.name.as_str()
            };
            let page = Page::Namespace {
                name: &ns.name,
                types: &ns.types,
            };
            let mut ns_node = self.node(namespace_slug(&ns.name), label, page, format!("namespace {label}"))?;

            for ty in &ns.types {
                ns_node.children.push(self.type_node(ty)?);
                type_count += 1;
            }

            let groups = classifier.extension_groups(&ns.name);
            if !groups.is_empty() {
                ns_node.children.push(self.extensions_node(&ns.name, groups)?);
            }

            tracing::debug!(namespace = label, types = ns.types.len(), "Built namespace subtree");
            root.children.push(ns_node);
        }

        tracing::info!(
            namespaces = root.children.len(),
            types = type_count,
            pages = self.registry.len(),
            "Built site tree"
        );

        Ok(SiteTree {
            namespace_count: root.children.len(),
            root,
            type_count,
        })
    }

    fn node(
        &mut self,
        slug: Slug,
        label: impl Into<String>,
        page: Page<'a>,
        owner: impl Into<String>,
    ) -> Result<SiteNode<'a>, SiteError> {
        self.registry.claim(&slug, owner)?;
        Ok(SiteNode::new(slug, label, page))
    }

    fn type_node(&mut self, ty: &'a TypeDef) -> Result<SiteNode<'a>, SiteError> {
        let classification = self.classifier.classify(ty);
        let full_name = ty.full_name();

        // Grouped pages list every visible member; only declared members get
        // their own pages, owned by the declaring type's subtree.
        let mut groups = Vec::new();
        if ty.kind != TypeKind::Enum {
            for kind in MemberKind::ALL {
                if !classification.has_members(kind) {
                    continue;
                }
                let members: Vec<ViewedMember<'a>> = classification.members(kind).copied().collect();
                let declared: Vec<ViewedMember<'a>> = classification.declared_of(kind).copied().collect();
                groups.push((kind, members, declared));
            }
        }

        let page = Page::Type {
            ty,
            classification: Box::new(classification),
        };
        let mut type_node = self.node(
            type_slug(ty),
            ty.display_name(),
            page,
            format!("type {full_name}"),
        )?;

        for (kind, members, declared) in groups {
            let page = Page::MemberGroup { ty, kind, members };
            let mut group_node = self.node(
                group_slug(ty, kind),
                kind.label(),
                page,
                format!("{} of {full_name}", kind.label().to_lowercase()),
            )?;
            for member in declared {
                group_node.children.push(self.member_node(member)?);
            }
            type_node.children.push(group_node);
        }

        Ok(type_node)
    }

    fn extensions_node(
        &mut self,
        namespace: &'a str,
        groups: &[ExtensionGroup<'a>],
    ) -> Result<SiteNode<'a>, SiteError> {
        let page = Page::ExtensionMethods {
            namespace,
            groups: groups.to_vec(),
        };
        let mut node = self.node(
            extensions_slug(namespace),
            "Extension Methods",
            page,
            format!("extension methods of namespace {namespace}"),
        )?;
        for group in groups {
            for member in &group.methods {
                node.children.push(self.member_node(*member)?);
            }
        }
        Ok(node)
    }

    fn member_node(&mut self, member: ViewedMember<'a>) -> Result<SiteNode<'a>, SiteError> {
        let owner = format!("{} {}", kind_word(&member), qualified_label(&member));
        self.node(member.slug(), member_label(&member), Page::Member(member), owner)
    }
}

fn kind_word(member: &ViewedMember<'_>) -> &'static str {
    match member.member {
        MemberRef::Constructor(_) => "constructor",
        MemberRef::Property(_) => "property",
        MemberRef::Method(_) => "method",
    }
}

fn qualified_label(member: &ViewedMember<'_>) -> String {
    format!("{}.{}", member.owner.full_name(), member_label(member))
}

/// Navigation label of a member: `Radius`, `Area()`, `Circle(double)`,
/// `Create<T>()`, `Scale(this Circle, double)`.
pub fn member_label(member: &ViewedMember<'_>) -> String {
    match member.member {
        MemberRef::Property(property) => property.name.clone(),
        MemberRef::Constructor(ctor) => signature_label(member.name(), &ctor.parameters, false),
        MemberRef::Method(method) if method.generic_parameters.is_empty() => {
            signature_label(&method.name, &method.parameters, method.is_extension)
        }
        MemberRef::Method(method) => {
            let name = format!("{}<{}>", method.name, method.generic_parameters.join(", "));
            signature_label(&name, &method.parameters, method.is_extension)
        }
    }
}

/// Extension methods mark their first parameter with `this`.
fn signature_label(name: &str, parameters: &[Parameter], is_extension: bool) -> String {
    let parameters: Vec<String> = parameters
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let label = type_label(&p.parameter_type);
            if is_extension && index == 0 {
                format!("this {label}")
            } else {
                label
            }
        })
        .collect();
    format!("{name}({})", parameters.join(", "))
}

/// Short, link-free display of a type reference.
pub fn type_label(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Named(name) => short_name(name),
        TypeReference::GenericParameter(name) => name.clone(),
        TypeReference::Array(element) => format!("{}[]", type_label(element)),
        TypeReference::ByRef(element) => type_label(element),
        TypeReference::Pointer(element) => format!("{}*", type_label(element)),
        TypeReference::GenericInstance { definition, arguments } => {
            let arguments: Vec<String> = arguments.iter().map(type_label).collect();
            format!("{}<{}>", short_name(definition), arguments.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use refdoc_model::{
        Assembly, ConstructorDef, EnumValueDef, MethodDef, PropertyDef, TypeReference,
    };

    use super::*;

    fn double() -> TypeReference {
        TypeReference::named("System.Double")
    }

    fn shapes() -> Documentation {
        let circle = TypeDef::class("Shapes", "Circle")
            .with_constructor(ConstructorDef::new(vec![Parameter::new("radius", double())]))
            .with_property(PropertyDef::new("Radius", double()))
            .with_method(MethodDef::new("Area", vec![]).returning(double()));
        let square = TypeDef::class("Shapes", "Square").with_base(TypeReference::named("Shapes.Shape"));
        let ring = TypeDef::class("Shapes", "Ring").with_base(TypeReference::named("Shapes.Circle"));
        let color = TypeDef::new("Shapes", "Color", TypeKind::Enum)
            .with_enum_value(EnumValueDef::new("Red", 0))
            .with_enum_value(EnumValueDef::new("Green", 1));
        let extensions = TypeDef::class("Shapes", "ShapeExtensions")
            .into_static()
            .with_method(MethodDef::extension(
                "Scale",
                vec![
                    Parameter::new("circle", TypeReference::named("Shapes.Circle")),
                    Parameter::new("factor", double()),
                ],
            ));
        let program = TypeDef::class("Printing", "Printer");

        Documentation::from_assemblies(vec![Assembly::new(
            "Shapes",
            vec![circle, square, ring, color, extensions, program],
        )])
        .unwrap()
    }

    fn slugs(tree: &SiteTree<'_>) -> Vec<String> {
        tree.walk().iter().map(|v| v.node.slug.to_string()).collect()
    }

    #[test]
    fn test_tree_order_and_shape() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        assert_eq!(
            slugs(&tree),
            vec![
                "index",
                "N_Shapes",
                "T_Shapes.Circle",
                "T_Shapes.Circle-constructors",
                "C_Shapes.Circle.ctor",
                "T_Shapes.Circle-properties",
                "P_Shapes.Circle.Radius",
                "T_Shapes.Circle-methods",
                "M_Shapes.Circle.Area",
                "T_Shapes.Square",
                "T_Shapes.Ring",
                "T_Shapes.Ring-properties",
                "T_Shapes.Ring-methods",
                "T_Shapes.Color",
                "T_Shapes.ShapeExtensions",
                "N_Shapes-extensions",
                "M_Shapes.ShapeExtensions.Scale",
                "N_Printing",
                "T_Printing.Printer",
            ]
        );
        assert_eq!(tree.namespace_count(), 2);
        assert_eq!(tree.type_count(), 6);
        assert_eq!(tree.len(), 19);
    }

    #[test]
    fn test_namespace_without_extensions_has_no_extensions_node() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        assert!(tree.find("N_Printing-extensions").is_none());
        let printing = tree.find("N_Printing").unwrap();
        assert_eq!(printing.children.len(), 1);
    }

    #[test]
    fn test_enum_terminates_at_type_node() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let color = tree.find("T_Shapes.Color").unwrap();
        assert!(color.children.is_empty());
    }

    #[test]
    fn test_inherited_only_group_lists_inherited_members() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let group = tree.find("T_Shapes.Ring-methods").unwrap();
        assert!(group.children.is_empty());
        let Page::MemberGroup { members, .. } = &group.page else {
            panic!("expected member group page");
        };
        let names: Vec<&str> = members.iter().map(ViewedMember::name).collect();
        assert_eq!(names, vec!["Area"]);
        assert!(members[0].is_inherited());
    }

    #[test]
    fn test_extension_target_shows_extension_in_methods() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let group = tree.find("T_Shapes.Circle-methods").unwrap();
        let Page::MemberGroup { members, .. } = &group.page else {
            panic!("expected member group page");
        };
        let names: Vec<&str> = members.iter().map(ViewedMember::name).collect();
        assert_eq!(names, vec!["Area", "Scale"]);
        // The extension method's own page lives under the namespace.
        assert_eq!(group.children.len(), 1);
    }

    #[test]
    fn test_slugs_are_unique() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let all = slugs(&tree);
        let unique: HashSet<&String> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_duplicate_type_is_collision() {
        let doc = Documentation::from_assemblies(vec![
            Assembly::new("A", vec![TypeDef::class("Shapes", "Circle")]),
            Assembly::new("B", vec![TypeDef::class("Shapes", "Circle")]),
        ])
        .unwrap();
        let classifier = Classifier::new(&doc);

        let err = SiteTree::build(&classifier).unwrap_err();

        let SiteError::NamingCollision { slug, .. } = err else {
            panic!("expected naming collision, got {err}");
        };
        assert_eq!(slug, "T_Shapes.Circle");
    }

    #[test]
    fn test_walk_ancestors() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let visits = tree.walk();
        let radius = visits
            .iter()
            .find(|v| v.node.slug.as_str() == "P_Shapes.Circle.Radius")
            .unwrap();
        let path: Vec<&str> = radius.ancestors.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(
            path,
            vec!["index", "N_Shapes", "T_Shapes.Circle", "T_Shapes.Circle-properties"]
        );
    }

    #[test]
    fn test_global_namespace_label() {
        let doc = Documentation::from_assemblies(vec![Assembly::new(
            "App",
            vec![TypeDef::class("", "Program")],
        )])
        .unwrap();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let ns = tree.find("N_").unwrap();
        assert_eq!(ns.label, GLOBAL_NAMESPACE_LABEL);
        assert!(tree.find("T_Program").is_some());
    }

    #[test]
    fn test_member_labels() {
        let doc = shapes();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        assert_eq!(tree.find("C_Shapes.Circle.ctor").unwrap().label, "Circle(double)");
        assert_eq!(tree.find("M_Shapes.Circle.Area").unwrap().label, "Area()");
        assert_eq!(
            tree.find("M_Shapes.ShapeExtensions.Scale").unwrap().label,
            "Scale(this Circle, double)"
        );
    }

    #[test]
    fn test_generic_method_overloads_build() {
        let int = TypeReference::named("System.Int32");
        let string = TypeReference::named("System.String");
        let factory = TypeDef::class("Shapes", "Factory")
            .with_method(MethodDef::new("Create", vec![]))
            .with_method(MethodDef {
                generic_parameters: vec!["T".to_owned()],
                ..MethodDef::new("Create", vec![])
            })
            .with_method(MethodDef::new(
                "Pair",
                vec![
                    Parameter::new("pair", TypeReference::instance("System.Tuple`1", vec![int.clone()])),
                    Parameter::new("name", string.clone()),
                ],
            ))
            .with_method(MethodDef::new(
                "Pair",
                vec![Parameter::new(
                    "pair",
                    TypeReference::instance("System.Tuple`2", vec![int, string]),
                )],
            ));
        let doc = Documentation::from_assemblies(vec![Assembly::new("Shapes", vec![factory])]).unwrap();
        let classifier = Classifier::new(&doc);

        let tree = SiteTree::build(&classifier).unwrap();

        assert_eq!(tree.find("M_Shapes.Factory.Create-").unwrap().label, "Create()");
        assert_eq!(tree.find("M_Shapes.Factory.Create``1-").unwrap().label, "Create<T>()");
        assert!(tree.find("M_Shapes.Factory.Pair-System.Tuple{int},string").is_some());
        assert!(tree.find("M_Shapes.Factory.Pair-System.Tuple{int,string}").is_some());
    }

    #[test]
    fn test_case_only_difference_is_collision() {
        let doc = Documentation::from_assemblies(vec![Assembly::new(
            "Shapes",
            vec![
                TypeDef::class("Shapes", "Circle")
                    .with_property(PropertyDef::new("Value", TypeReference::named("System.Int32")))
                    .with_property(PropertyDef::new("value", TypeReference::named("System.Int32"))),
            ],
        )])
        .unwrap();
        let classifier = Classifier::new(&doc);

        let err = SiteTree::build(&classifier).unwrap_err();

        let SiteError::CaseCollision { first_slug, second_slug, .. } = err else {
            panic!("expected case collision, got {err}");
        };
        assert_eq!(first_slug, "P_Shapes.Circle.Value");
        assert_eq!(second_slug, "P_Shapes.Circle.value");
    }

    #[test]
    fn test_type_label_generic_instance() {
        let reference = TypeReference::array_of(TypeReference::instance(
            "System.Collections.Generic.Dictionary`2",
            vec![TypeReference::named("System.String"), TypeReference::generic_parameter("T")],
        ));
        assert_eq!(type_label(&reference), "Dictionary<string, T>[]");
    }
}
