//! Type-system metadata model for refdoc.
//!
//! This crate is the read-only facade the site generator queries:
//!
//! - [`TypeDef`] and its members ([`ConstructorDef`], [`PropertyDef`],
//!   [`MethodDef`], [`EnumValueDef`]) describe documented declarations
//! - [`TypeReference`] points at a type from a signature or relationship
//! - [`MetadataSource`] loads an [`Assembly`] from a compiled-artifact
//!   description ([`JsonSource`]), attaching XML documentation comments
//! - [`Documentation`] is the documented set built from all loaded
//!   assemblies, answering locality and canonicalization queries
//!
//! # Example
//!
//! ```ignore
//! use refdoc_model::{Documentation, JsonSource, MetadataSource};
//!
//! let sources: Vec<Box<dyn MetadataSource>> = vec![Box::new(JsonSource::new("Shapes.json"))];
//! let doc = Documentation::load(&sources)?;
//! for ns in doc.namespaces() {
//!     println!("{}: {} types", ns.name, ns.types.len());
//! }
//! ```

mod documentation;
mod entity;
#[cfg(feature = "mock")]
mod mock;
mod names;
mod reference;
mod source;
pub mod xmldoc;

pub use documentation::{Documentation, Namespace};
pub use entity::{
    Access, Assembly, AttributeArgument, AttributeDef, AttributeValue, ConstructorDef, Documented,
    EnumValueDef, MethodDef, Parameter, ParameterModifier, PropertyDef, TypeDef, TypeKind,
};
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use names::{ROOT_TYPE, alias, display_full_name, namespace_of, short_name, simple_name, strip_arity};
pub use reference::TypeReference;
pub use source::{JsonSource, MetadataError, MetadataSource};

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Documentation: Send, Sync);
    assert_impl_all!(TypeDef: Send, Sync, Clone);
    assert_impl_all!(TypeReference: Send, Sync, Clone, Eq, std::hash::Hash);
    assert_impl_all!(MetadataError: Send, Sync, std::error::Error);
}
