//! Site model for refdoc.
//!
//! This crate turns a documented set into a consistent, collision-free
//! multi-page site model:
//!
//! - [`naming`]: page identities ([`Slug`]) for namespaces, types and members
//! - [`LinkResolver`]: local, external or plain-text targets for type references
//! - [`Classifier`]: declared, inherited and extension members of each type,
//!   plus derived types, implementors and implemented interfaces
//! - [`SiteTree`]: the navigable hierarchy of pages
//! - [`Navigation`]: the sidebar, derived once from the tree
//!
//! # Quick Start
//!
//! ```ignore
//! use refdoc_site::{Classifier, Navigation, SiteTree};
//!
//! let classifier = Classifier::new(&doc);
//! let tree = SiteTree::build(&classifier)?;
//! let nav = Navigation::from_tree(&tree, "html");
//! for visit in tree.walk() {
//!     println!("{}", visit.node.slug.file_name("html"));
//! }
//! ```

mod classify;
mod error;
pub mod naming;
mod navigation;
mod resolve;
mod tree;

pub use classify::{
    Classification, Classifier, ExtensionGroup, MemberRef, Origin, ViewedMember,
};
pub use error::SiteError;
pub use naming::{MemberKind, Slug, SlugRegistry};
pub use navigation::{BreadcrumbItem, NavItem, Navigation, breadcrumbs};
pub use resolve::{ExternalLinks, LinkResolver, LinkTarget, ResolvedType};
pub use tree::{GLOBAL_NAMESPACE_LABEL, Page, SiteNode, SiteTree, Visit, member_label, type_label};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use refdoc_model::{
        Documentation, MetadataSource, MethodDef, MockSource, Parameter, PropertyDef, TypeDef,
        TypeReference,
    };
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(SiteTree<'static>: Send, Sync);
    assert_impl_all!(Navigation: Send, Sync, Clone);
    assert_impl_all!(LinkResolver<'static>: Send, Sync);
    assert_impl_all!(SiteError: Send, Sync, std::error::Error);

    fn load(sources: Vec<Box<dyn MetadataSource>>) -> Documentation {
        Documentation::load(&sources).unwrap()
    }

    /// `Shapes` with `Circle` (no base, `Radius`, `Area()`) and `Square`
    /// deriving from the undocumented `Shapes.Shape`.
    fn shapes_scenario() -> Documentation {
        let circle = TypeDef::class("Shapes", "Circle")
            .with_property(PropertyDef::new("Radius", TypeReference::named("System.Double")))
            .with_method(MethodDef::new("Area", vec![]).returning(TypeReference::named("System.Double")));
        let square = TypeDef::class("Shapes", "Square").with_base(TypeReference::named("Shapes.Shape"));
        load(vec![Box::new(MockSource::new("Shapes").with_type(circle).with_type(square))])
    }

    #[test]
    fn test_shapes_scenario() {
        let doc = shapes_scenario();
        let classifier = Classifier::new(&doc);
        let resolver = LinkResolver::new(&doc, ExternalLinks::default(), "html");
        let tree = SiteTree::build(&classifier).unwrap();

        let ns = tree.find("N_Shapes").unwrap();
        let types: Vec<&str> = ns.children.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(types, vec!["T_Shapes.Circle", "T_Shapes.Square"]);

        let circle = tree.find("T_Shapes.Circle").unwrap();
        let Page::Type { classification, .. } = &circle.page else {
            panic!("expected type page");
        };
        assert!(classification.base_type.is_none());
        let properties: Vec<&str> = classification
            .members(MemberKind::Property)
            .map(ViewedMember::name)
            .collect();
        assert_eq!(properties, vec!["Radius"]);

        let square = tree.find("T_Shapes.Square").unwrap();
        let Page::Type { classification, .. } = &square.page else {
            panic!("expected type page");
        };
        let base = classification.base_type.unwrap();
        assert_eq!(resolver.resolve(base), LinkTarget::Unlinkable);
        assert_eq!(resolver.display(base).text, "Shapes.Shape");
    }

    #[test]
    fn test_naming_uniqueness_across_entities() {
        let ops = TypeDef::class("Shapes", "Ops")
            .with_method(MethodDef::new("Foo", vec![Parameter::new("x", TypeReference::named("System.Int32"))]))
            .with_method(MethodDef::new("Foo", vec![Parameter::new("x", TypeReference::named("System.String"))]))
            .with_method(MethodDef::new("Bar", vec![]))
            .with_property(PropertyDef::new("Foo", TypeReference::named("System.Int32")));
        let nested = TypeDef::class("Shapes", "Ops+Foo");
        let generic = TypeDef::class("Shapes", "Ops`1").with_generic_parameters(&["T"]);
        let doc = load(vec![Box::new(
            MockSource::new("Shapes")
                .with_type(ops)
                .with_type(nested)
                .with_type(generic),
        )]);
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();

        let visits = tree.walk();
        let files: HashSet<String> = visits.iter().map(|v| v.node.slug.file_name("html")).collect();
        assert_eq!(files.len(), visits.len());

        let foo_int = tree.find("M_Shapes.Ops.Foo-int").unwrap();
        let foo_string = tree.find("M_Shapes.Ops.Foo-string").unwrap();
        let bar = tree.find("M_Shapes.Ops.Bar").unwrap();
        assert_ne!(foo_int.slug, foo_string.slug);
        assert!(!bar.slug.as_str().contains('-'));
    }

    #[test]
    fn test_generic_canonicalization_idempotence() {
        let container = TypeDef::class("Shapes", "Container`1").with_generic_parameters(&["T"]);
        let doc = load(vec![Box::new(MockSource::new("Shapes").with_type(container))]);
        let resolver = LinkResolver::new(&doc, ExternalLinks::default(), "html");

        let of_int = TypeReference::instance("Shapes.Container`1", vec![TypeReference::named("System.Int32")]);
        let of_string = TypeReference::instance("Shapes.Container`1", vec![TypeReference::named("System.String")]);
        let definition = doc.find_type("Shapes.Container`1").unwrap();

        let expected = naming::type_slug(definition);
        assert_eq!(naming::type_slug(doc.normalize(&of_int).unwrap()), expected);
        assert_eq!(naming::type_slug(doc.normalize(&of_string).unwrap()), expected);
        assert_eq!(resolver.resolve(&of_int), resolver.resolve(&of_string));
    }

    #[test]
    fn test_resolution_matches_tree_identity() {
        let doc = shapes_scenario();
        let classifier = Classifier::new(&doc);
        let resolver = LinkResolver::new(&doc, ExternalLinks::default(), "html");
        let tree = SiteTree::build(&classifier).unwrap();

        let circle = tree.find("T_Shapes.Circle").unwrap();
        assert_eq!(
            resolver.resolve(&TypeReference::named("Shapes.Circle")),
            LinkTarget::Local(circle.slug.href(resolver.extension()))
        );
    }

    #[test]
    fn test_navigation_links_exactly_the_tree() {
        let doc = shapes_scenario();
        let classifier = Classifier::new(&doc);
        let tree = SiteTree::build(&classifier).unwrap();
        let nav = Navigation::from_tree(&tree, "html");

        let linked: HashSet<&str> = nav.hrefs().into_iter().collect();
        let pages: HashSet<String> = tree.walk().iter().map(|v| v.node.slug.href("html")).collect();

        assert_eq!(linked.len(), pages.len());
        assert!(pages.iter().all(|href| linked.contains(href.as_str())));
    }

    #[test]
    fn test_failing_source_aborts_load() {
        let sources: Vec<Box<dyn MetadataSource>> = vec![
            Box::new(MockSource::new("Shapes")),
            Box::new(MockSource::new("Broken").failing("corrupt artifact")),
        ];
        assert!(Documentation::load(&sources).is_err());
    }
}
