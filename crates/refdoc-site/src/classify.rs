//! Inheritance and membership classification.
//!
//! For each documented type, [`Classifier::classify`] computes the members
//! visible on it and where they come from:
//!
//! - declared on the type itself
//! - inherited from a documented ancestor, unless redeclared on the type
//!   or a nearer ancestor
//! - extension methods whose first parameter targets the type
//!
//! "Inherited" is relative to the viewing type: the same declaration is
//! declared on its owner and inherited on every descendant exposing it.
//! Derived types and implementors are computed once for the whole set.

use std::collections::{HashMap, HashSet};

use refdoc_model::{
    ConstructorDef, Documentation, Documented, MethodDef, PropertyDef, ROOT_TYPE, TypeDef,
    TypeKind, TypeReference,
};

use crate::naming::{
    MemberKind, Slug, constructor_slug, method_fingerprint, method_slug, property_slug,
    type_fingerprint,
};

/// Reference to a member declaration.
#[derive(Clone, Copy, Debug)]
pub enum MemberRef<'a> {
    /// Constructor.
    Constructor(&'a ConstructorDef),
    /// Property.
    Property(&'a PropertyDef),
    /// Method, including extension methods.
    Method(&'a MethodDef),
}

/// How a member became visible on the viewing type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Declared by the viewing type.
    Declared,
    /// Declared by an ancestor.
    Inherited,
    /// Extension method targeting the viewing type.
    Extension,
}

/// A member as seen from a particular type.
#[derive(Clone, Copy, Debug)]
pub struct ViewedMember<'a> {
    /// Declaring type.
    pub owner: &'a TypeDef,
    /// Member declaration.
    pub member: MemberRef<'a>,
    /// Relation to the viewing type.
    pub origin: Origin,
}

impl<'a> ViewedMember<'a> {
    /// Member declared by `owner`, viewed from `owner`.
    pub fn declared(owner: &'a TypeDef, member: MemberRef<'a>) -> Self {
        Self {
            owner,
            member,
            origin: Origin::Declared,
        }
    }

    /// True when the member is declared on an ancestor of the viewing type.
    pub fn is_inherited(&self) -> bool {
        self.origin == Origin::Inherited
    }

    /// Member group.
    pub fn kind(&self) -> MemberKind {
        match self.member {
            MemberRef::Constructor(_) => MemberKind::Constructor,
            MemberRef::Property(_) => MemberKind::Property,
            MemberRef::Method(_) => MemberKind::Method,
        }
    }

    /// Member name; constructors are named after their type.
    pub fn name(&self) -> &'a str {
        match self.member {
            MemberRef::Constructor(_) => {
                let name = self.owner.name.rsplit('+').next().unwrap_or(&self.owner.name);
                name.split('`').next().unwrap_or(name)
            }
            MemberRef::Property(property) => &property.name,
            MemberRef::Method(method) => &method.name,
        }
    }

    /// Page identity of the member, always computed from the declaring type.
    pub fn slug(&self) -> Slug {
        match self.member {
            MemberRef::Constructor(ctor) => constructor_slug(self.owner, ctor),
            MemberRef::Property(property) => property_slug(self.owner, property),
            MemberRef::Method(method) => method_slug(self.owner, method),
        }
    }

    /// Summary comment.
    pub fn summary(&self) -> Option<&'a str> {
        match self.member {
            MemberRef::Constructor(ctor) => ctor.summary(),
            MemberRef::Property(property) => property.summary(),
            MemberRef::Method(method) => method.summary(),
        }
    }

    /// Static member.
    fn is_static(&self) -> bool {
        match self.member {
            MemberRef::Constructor(_) => true,
            MemberRef::Property(property) => property.is_static,
            MemberRef::Method(method) => method.is_static,
        }
    }

    /// Key hiding members of ancestors: property name, or method name,
    /// generic arity and parameter fingerprint.
    fn hiding_key(&self) -> Option<String> {
        match self.member {
            MemberRef::Constructor(_) => None,
            MemberRef::Property(property) => Some(format!("P:{}", property.name)),
            MemberRef::Method(method) => Some(format!("M:{}", method_fingerprint(method))),
        }
    }
}

/// Members and relationships of one type.
#[derive(Debug)]
pub struct Classification<'a> {
    /// Members declared on the type, extension methods excluded.
    pub declared: Vec<ViewedMember<'a>>,
    /// Members inherited from documented ancestors, nearest first.
    pub inherited: Vec<ViewedMember<'a>>,
    /// Extension methods targeting the type.
    pub extensions: Vec<ViewedMember<'a>>,
    /// Explicit base type, unless it is the universal root type.
    pub base_type: Option<&'a TypeReference>,
    /// Documented types deriving directly from the type.
    pub derived_types: Vec<&'a TypeDef>,
    /// Interfaces implemented by the type or its documented ancestors.
    pub implemented_interfaces: Vec<&'a TypeReference>,
    /// Documented types implementing the type, for interfaces.
    pub implementors: Vec<&'a TypeDef>,
}

impl<'a> Classification<'a> {
    /// Visible members of one kind: declared, inherited, then extensions.
    pub fn members(&self, kind: MemberKind) -> impl Iterator<Item = &ViewedMember<'a>> {
        self.declared
            .iter()
            .chain(&self.inherited)
            .chain(&self.extensions)
            .filter(move |m| m.kind() == kind)
    }

    /// Declared members of one kind.
    pub fn declared_of(&self, kind: MemberKind) -> impl Iterator<Item = &ViewedMember<'a>> {
        self.declared.iter().filter(move |m| m.kind() == kind)
    }

    /// True when the type shows at least one member of this kind.
    pub fn has_members(&self, kind: MemberKind) -> bool {
        self.members(kind).next().is_some()
    }
}

/// Extension methods of one namespace, grouped by extended type.
#[derive(Clone, Debug)]
pub struct ExtensionGroup<'a> {
    /// Extended type.
    pub target: &'a TypeReference,
    /// Extension methods, in declaration order.
    pub methods: Vec<ViewedMember<'a>>,
}

/// Extension methods of the documented set.
#[derive(Debug, Default)]
struct ExtensionIndex<'a> {
    by_namespace: HashMap<&'a str, Vec<ExtensionGroup<'a>>>,
    by_target: HashMap<String, Vec<ViewedMember<'a>>>,
}

/// Identity of an extended type: the canonical name for named types, the
/// fingerprint for arrays and generic parameters.
fn target_key(reference: &TypeReference) -> String {
    reference
        .canonical_name()
        .map_or_else(|| type_fingerprint(reference), str::to_owned)
}

impl<'a> ExtensionIndex<'a> {
    fn build(doc: &'a Documentation) -> Self {
        let mut index = Self::default();

        for ns in doc.namespaces() {
            let mut groups: Vec<ExtensionGroup<'a>> = Vec::new();
            for ty in &ns.types {
                for method in &ty.methods {
                    if !method.is_extension {
                        continue;
                    }
                    let Some(target) = method.extended_type() else {
                        tracing::warn!(
                            ty = %ty.full_name(),
                            method = %method.name,
                            "Extension method without parameters ignored"
                        );
                        continue;
                    };
                    let viewed = ViewedMember {
                        owner: ty,
                        member: MemberRef::Method(method),
                        origin: Origin::Extension,
                    };
                    let key = target_key(target);

                    match groups.iter_mut().find(|g| target_key(g.target) == key) {
                        Some(group) => group.methods.push(viewed),
                        None => groups.push(ExtensionGroup {
                            target,
                            methods: vec![viewed],
                        }),
                    }
                    index.by_target.entry(key).or_default().push(viewed);
                }
            }
            if !groups.is_empty() {
                index.by_namespace.insert(ns.name.as_str(), groups);
            }
        }

        index
    }
}

/// Computes member visibility and type relationships over a documented set.
///
/// Relationship inversions are computed once at construction; classifying a
/// type afterwards only walks its ancestor chain.
#[derive(Debug)]
pub struct Classifier<'a> {
    doc: &'a Documentation,
    derived: HashMap<String, Vec<&'a TypeDef>>,
    implementors: HashMap<String, Vec<&'a TypeDef>>,
    extensions: ExtensionIndex<'a>,
}

impl<'a> Classifier<'a> {
    /// Index the documented set.
    pub fn new(doc: &'a Documentation) -> Self {
        let mut derived: HashMap<String, Vec<&'a TypeDef>> = HashMap::new();
        let mut implementors: HashMap<String, Vec<&'a TypeDef>> = HashMap::new();

        for ty in doc.types() {
            if let Some(base) = doc.base_type(ty) {
                derived.entry(base.full_name()).or_default().push(ty);
            }
            for interface in doc.interfaces(ty) {
                implementors.entry(interface.full_name()).or_default().push(ty);
            }
        }

        Self {
            doc,
            derived,
            implementors,
            extensions: ExtensionIndex::build(doc),
        }
    }

    /// Documented set being classified.
    pub fn documentation(&self) -> &'a Documentation {
        self.doc
    }

    /// Extension method groups declared in a namespace.
    pub fn extension_groups(&self, namespace: &str) -> &[ExtensionGroup<'a>] {
        self.extensions
            .by_namespace
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Classify the members and relationships of a documented type.
    pub fn classify(&self, ty: &'a TypeDef) -> Classification<'a> {
        let declared = declared_members(ty);
        let inherited = if ty.kind == TypeKind::Enum {
            Vec::new()
        } else {
            self.inherited_members(ty, &declared)
        };
        let full_name = ty.full_name();

        Classification {
            extensions: self
                .extensions
                .by_target
                .get(&full_name)
                .cloned()
                .unwrap_or_default(),
            base_type: ty
                .base
                .as_ref()
                .filter(|base| base.canonical_name() != Some(ROOT_TYPE)),
            derived_types: self.derived.get(&full_name).cloned().unwrap_or_default(),
            implemented_interfaces: self.implemented_interfaces(ty),
            implementors: self.implementors.get(&full_name).cloned().unwrap_or_default(),
            declared,
            inherited,
        }
    }

    /// Documented ancestors, nearest first. Stops at a cycle.
    fn ancestors(&self, ty: &'a TypeDef) -> Vec<&'a TypeDef> {
        let mut seen = HashSet::from([ty.full_name()]);
        let mut chain = Vec::new();
        let mut current = ty;

        while let Some(base) = self.doc.base_type(current) {
            if !seen.insert(base.full_name()) {
                tracing::warn!(ty = %ty.full_name(), "Inheritance cycle detected, ancestor chain truncated");
                break;
            }
            chain.push(base);
            current = base;
        }

        if let Some(base) = current.base.as_ref()
            && self.doc.normalize(base).is_none()
            && base.canonical_name() != Some(ROOT_TYPE)
        {
            tracing::warn!(
                ty = %ty.full_name(),
                base = ?base.canonical_name(),
                "Base type not documented, inherited members limited to documented ancestors"
            );
        }

        chain
    }

    fn inherited_members(&self, ty: &'a TypeDef, declared: &[ViewedMember<'a>]) -> Vec<ViewedMember<'a>> {
        let mut hidden: HashSet<String> = declared.iter().filter_map(ViewedMember::hiding_key).collect();
        let mut inherited = Vec::new();

        for ancestor in self.ancestors(ty) {
            for member in declared_members(ancestor) {
                if member.kind() == MemberKind::Constructor || member.is_static() {
                    continue;
                }
                let Some(key) = member.hiding_key() else {
                    continue;
                };
                if hidden.insert(key) {
                    inherited.push(ViewedMember {
                        origin: Origin::Inherited,
                        ..member
                    });
                }
            }
        }

        inherited
    }

    fn implemented_interfaces(&self, ty: &'a TypeDef) -> Vec<&'a TypeReference> {
        let mut seen = HashSet::new();
        std::iter::once(ty)
            .chain(self.ancestors(ty))
            .flat_map(|t| t.interfaces.iter())
            .filter(|interface| seen.insert(target_key(interface)))
            .collect()
    }
}

/// Members a type declares, extension methods excluded.
fn declared_members(ty: &TypeDef) -> Vec<ViewedMember<'_>> {
    let constructors = ty.constructors.iter().map(MemberRef::Constructor);
    let properties = ty.properties.iter().map(MemberRef::Property);
    let methods = ty
        .methods
        .iter()
        .filter(|m| !m.is_extension)
        .map(MemberRef::Method);

    constructors
        .chain(properties)
        .chain(methods)
        .map(|member| ViewedMember::declared(ty, member))
        .collect()
}
