//! Lightweight references to types.

use serde::{Deserialize, Serialize};

/// Reference to a type used by a member signature or a type relationship.
///
/// A reference may point at a documented type, at an external type, or at a
/// generic parameter. It never owns the referenced definition.
///
/// Serialized externally tagged, e.g. `{"named": "System.String"}` or
/// ``{"generic_instance": {"definition": "System.Collections.Generic.List`1", "arguments": [...]}}``.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeReference {
    /// Non-generic type or open generic definition, by full name.
    Named(String),
    /// Generic type parameter such as `T`.
    GenericParameter(String),
    /// Single-dimensional array of the element type.
    Array(Box<TypeReference>),
    /// By-reference parameter type (`ref`/`out`).
    ByRef(Box<TypeReference>),
    /// Unmanaged pointer to the element type.
    Pointer(Box<TypeReference>),
    /// Closed generic instantiation of a definition.
    GenericInstance {
        /// Full name of the generic definition (with arity marker).
        definition: String,
        /// Type arguments in declaration order.
        arguments: Vec<TypeReference>,
    },
}

impl TypeReference {
    /// Reference a type by full name.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self::Named(full_name.into())
    }

    /// Reference a generic parameter.
    pub fn generic_parameter(name: impl Into<String>) -> Self {
        Self::GenericParameter(name.into())
    }

    /// Array of `element`.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// By-reference `element`.
    #[must_use]
    pub fn by_ref(element: Self) -> Self {
        Self::ByRef(Box::new(element))
    }

    /// Pointer to `element`.
    #[must_use]
    pub fn pointer_to(element: Self) -> Self {
        Self::Pointer(Box::new(element))
    }

    /// Closed instantiation of `definition` with `arguments`.
    pub fn instance(definition: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::GenericInstance {
            definition: definition.into(),
            arguments,
        }
    }

    /// The `System.Void` return type.
    #[must_use]
    pub fn void() -> Self {
        Self::named("System.Void")
    }

    /// Element type of an array, by-ref or pointer reference.
    pub fn element(&self) -> Option<&Self> {
        match self {
            Self::Array(element) | Self::ByRef(element) | Self::Pointer(element) => Some(element),
            _ => None,
        }
    }

    /// Innermost type after unwrapping arrays, by-refs and pointers.
    pub fn innermost(&self) -> &Self {
        let mut current = self;
        while let Some(element) = current.element() {
            current = element;
        }
        current
    }

    /// Canonical full name used for identity: the generic definition for
    /// closed instantiations, the name itself for named types.
    ///
    /// Generic parameters and element-wrapping references have no canonical
    /// name of their own.
    pub fn canonical_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::GenericInstance { definition, .. } => Some(definition),
            _ => None,
        }
    }

    /// True for generic parameters.
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, Self::GenericParameter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_of_instance_is_definition() {
        let list_of_int = TypeReference::instance(
            "System.Collections.Generic.List`1",
            vec![TypeReference::named("System.Int32")],
        );
        assert_eq!(
            list_of_int.canonical_name(),
            Some("System.Collections.Generic.List`1")
        );
    }

    #[test]
    fn test_canonical_name_of_wrapped_reference_is_none() {
        let array = TypeReference::array_of(TypeReference::named("Shapes.Circle"));
        assert_eq!(array.canonical_name(), None);
        assert_eq!(array.innermost().canonical_name(), Some("Shapes.Circle"));
    }

    #[test]
    fn test_generic_parameter_has_no_canonical_name() {
        assert_eq!(TypeReference::generic_parameter("T").canonical_name(), None);
        assert!(TypeReference::generic_parameter("T").is_generic_parameter());
    }

    #[test]
    fn test_deserialize_externally_tagged() {
        let json = r#"{"generic_instance": {"definition": "Shapes.Container`1", "arguments": [{"named": "System.String"}]}}"#;
        let reference: TypeReference = serde_json::from_str(json).unwrap();
        assert_eq!(
            reference,
            TypeReference::instance("Shapes.Container`1", vec![TypeReference::named("System.String")])
        );
    }

    #[test]
    fn test_deserialize_nested_array() {
        let json = r#"{"array": {"array": {"generic_parameter": "T"}}}"#;
        let reference: TypeReference = serde_json::from_str(json).unwrap();
        assert_eq!(
            reference,
            TypeReference::array_of(TypeReference::array_of(TypeReference::generic_parameter("T")))
        );
    }
}
