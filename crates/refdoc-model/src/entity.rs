//! Documentable entities: types and their members.
//!
//! These are the projections of a compiled artifact that the site model
//! works with. Each carries only the fields the generator uses.

use serde::{Deserialize, Serialize};

use crate::names::strip_arity;
use crate::reference::TypeReference;

/// Kind of a documented type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Reference type.
    Class,
    /// Value type.
    Struct,
    /// Interface type.
    Interface,
    /// Enumeration.
    Enum,
}

impl TypeKind {
    /// Declaration keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

/// Member accessibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// `public`
    #[default]
    Public,
    /// `protected internal`
    ProtectedInternal,
    /// `protected`
    Protected,
    /// `internal`
    Internal,
    /// `private`
    Private,
}

impl Access {
    /// Access keyword(s).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::ProtectedInternal => "protected internal",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::Private => "private",
        }
    }

    /// Visibility rank, higher is more visible.
    fn rank(self) -> u8 {
        match self {
            Self::Public => 4,
            Self::ProtectedInternal => 3,
            Self::Protected => 2,
            Self::Internal => 1,
            Self::Private => 0,
        }
    }

    /// The more visible of two access levels.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if other.rank() > self.rank() { other } else { self }
    }
}

/// Modifier on a method or constructor parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterModifier {
    /// Plain by-value parameter.
    #[default]
    None,
    /// `ref` parameter.
    Ref,
    /// `out` parameter.
    Out,
    /// `params` array.
    Params,
}

/// Method or constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub parameter_type: TypeReference,
    /// Passing modifier.
    #[serde(default)]
    pub modifier: ParameterModifier,
}

impl Parameter {
    /// Create a by-value parameter.
    pub fn new(name: impl Into<String>, parameter_type: TypeReference) -> Self {
        Self {
            name: name.into(),
            parameter_type,
            modifier: ParameterModifier::None,
        }
    }

    /// Set the passing modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: ParameterModifier) -> Self {
        self.modifier = modifier;
        self
    }
}

/// Constant value passed to an attribute constructor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    Str(String),
}

/// Positional or named attribute argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeArgument {
    /// Property name for named arguments.
    #[serde(default)]
    pub name: Option<String>,
    /// Argument value.
    pub value: AttributeValue,
}

/// Custom attribute applied to a type or member.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    /// Full name of the attribute type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Constructor and named arguments.
    #[serde(default)]
    pub arguments: Vec<AttributeArgument>,
}

impl AttributeDef {
    /// Attribute without arguments.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            arguments: Vec::new(),
        }
    }
}

/// Entities that may carry a documentation summary.
pub trait Documented {
    /// Raw summary text as provided by the artifact.
    fn raw_summary(&self) -> Option<&str>;

    /// Summary text, `None` when missing or blank.
    fn summary(&self) -> Option<&str> {
        self.raw_summary().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Instance or static constructor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDef {
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Accessibility.
    #[serde(default)]
    pub access: Access,
    /// Custom attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    /// Summary comment.
    #[serde(default)]
    pub summary: Option<String>,
}

impl ConstructorDef {
    /// Public constructor with the given parameters.
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }
}

/// Property declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Property type.
    #[serde(rename = "type")]
    pub property_type: TypeReference,
    /// Getter accessibility, `None` when write-only.
    #[serde(default = "default_accessor")]
    pub getter: Option<Access>,
    /// Setter accessibility, `None` when read-only.
    #[serde(default)]
    pub setter: Option<Access>,
    /// Static property.
    #[serde(default)]
    pub is_static: bool,
    /// Custom attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    /// Summary comment.
    #[serde(default)]
    pub summary: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_accessor() -> Option<Access> {
    Some(Access::Public)
}

impl PropertyDef {
    /// Public read-only property.
    pub fn new(name: impl Into<String>, property_type: TypeReference) -> Self {
        Self {
            name: name.into(),
            property_type,
            getter: Some(Access::Public),
            setter: None,
            is_static: false,
            attributes: Vec::new(),
            summary: None,
        }
    }

    /// Add a setter with the given accessibility.
    #[must_use]
    pub fn with_setter(mut self, access: Access) -> Self {
        self.setter = Some(access);
        self
    }

    /// Attach a summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

/// Method declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    /// Method name.
    pub name: String,
    /// Generic parameter names of a generic method.
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Return type.
    #[serde(default = "TypeReference::void")]
    pub return_type: TypeReference,
    /// Accessibility.
    #[serde(default)]
    pub access: Access,
    /// Static method.
    #[serde(default)]
    pub is_static: bool,
    /// Abstract method.
    #[serde(default)]
    pub is_abstract: bool,
    /// Virtual method.
    #[serde(default)]
    pub is_virtual: bool,
    /// Overrides a base class method.
    #[serde(default)]
    pub is_override: bool,
    /// Extension method: the first parameter is the extended type.
    #[serde(default)]
    pub is_extension: bool,
    /// Custom attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    /// Summary comment.
    #[serde(default)]
    pub summary: Option<String>,
}

impl MethodDef {
    /// Public instance method returning `void`.
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            generic_parameters: Vec::new(),
            parameters,
            return_type: TypeReference::void(),
            access: Access::Public,
            is_static: false,
            is_abstract: false,
            is_virtual: false,
            is_override: false,
            is_extension: false,
            attributes: Vec::new(),
            summary: None,
        }
    }

    /// Static extension method extending the first parameter's type.
    pub fn extension(name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        Self {
            is_static: true,
            is_extension: true,
            ..Self::new(name, parameters)
        }
    }

    /// Set the return type.
    #[must_use]
    pub fn returning(mut self, return_type: TypeReference) -> Self {
        self.return_type = return_type;
        self
    }

    /// Attach a summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Type extended by an extension method.
    pub fn extended_type(&self) -> Option<&TypeReference> {
        if self.is_extension {
            self.parameters.first().map(|p| &p.parameter_type)
        } else {
            None
        }
    }
}

/// Named enumeration constant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDef {
    /// Constant name.
    pub name: String,
    /// Underlying value.
    pub value: i64,
    /// Summary comment.
    #[serde(default)]
    pub summary: Option<String>,
}

impl EnumValueDef {
    /// Create an enum value.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            summary: None,
        }
    }
}

/// Type declaration with its declared members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Declaring namespace (empty for the global namespace).
    #[serde(default)]
    pub namespace: String,
    /// Name within the namespace, with arity marker and `+` nesting.
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
    /// Static class.
    #[serde(default)]
    pub is_static: bool,
    /// Abstract class.
    #[serde(default)]
    pub is_abstract: bool,
    /// Sealed class.
    #[serde(default)]
    pub is_sealed: bool,
    /// Generic parameter names of a generic definition.
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    /// Explicit base type.
    #[serde(default)]
    pub base: Option<TypeReference>,
    /// Directly implemented interfaces.
    #[serde(default)]
    pub interfaces: Vec<TypeReference>,
    /// Declared constructors.
    #[serde(default)]
    pub constructors: Vec<ConstructorDef>,
    /// Declared properties.
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    /// Declared methods.
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    /// Enumeration constants.
    #[serde(default)]
    pub enum_values: Vec<EnumValueDef>,
    /// Custom attributes.
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    /// Summary comment.
    #[serde(default)]
    pub summary: Option<String>,
}

impl TypeDef {
    /// Create an empty type of the given kind.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            is_static: false,
            is_abstract: false,
            is_sealed: false,
            generic_parameters: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            enum_values: Vec::new(),
            attributes: Vec::new(),
            summary: None,
        }
    }

    /// Create an empty class.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    /// Full name (`Namespace.Name`).
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Name for display: nesting with dots, arity replaced by parameter list.
    ///
    /// ``Container`1`` with parameter `T` displays as `Container<T>`.
    pub fn display_name(&self) -> String {
        let name = strip_arity(&self.name);
        if self.generic_parameters.is_empty() {
            name
        } else {
            format!("{name}<{}>", self.generic_parameters.join(", "))
        }
    }

    /// True for generic type definitions.
    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    /// Set the base type.
    #[must_use]
    pub fn with_base(mut self, base: TypeReference) -> Self {
        self.base = Some(base);
        self
    }

    /// Add an implemented interface.
    #[must_use]
    pub fn with_interface(mut self, interface: TypeReference) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Set generic parameter names.
    #[must_use]
    pub fn with_generic_parameters(mut self, names: &[&str]) -> Self {
        self.generic_parameters = names.iter().map(|n| (*n).to_owned()).collect();
        self
    }

    /// Add a constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: ConstructorDef) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Add a method.
    #[must_use]
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Add an enumeration constant.
    #[must_use]
    pub fn with_enum_value(mut self, value: EnumValueDef) -> Self {
        self.enum_values.push(value);
        self
    }

    /// Attach a summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Mark as a static class.
    #[must_use]
    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

impl Documented for TypeDef {
    fn raw_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl Documented for ConstructorDef {
    fn raw_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl Documented for PropertyDef {
    fn raw_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl Documented for MethodDef {
    fn raw_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

impl Documented for EnumValueDef {
    fn raw_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// Contents of one compiled artifact.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Artifact name.
    pub name: String,
    /// Visible types in declaration order.
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl Assembly {
    /// Create an assembly from its types.
    pub fn new(name: impl Into<String>, types: Vec<TypeDef>) -> Self {
        Self {
            name: name.into(),
            types,
        }
    }
}
