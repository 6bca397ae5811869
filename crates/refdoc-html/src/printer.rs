//! Type references and declaration syntax as HTML.
//!
//! Every type name goes through [`LinkResolver::display`], so a reference
//! renders as an anchor exactly when the resolver says it is linkable.

use std::collections::HashSet;

use html_escape::{encode_double_quoted_attribute, encode_text};
use refdoc_model::{
    Access, AttributeDef, AttributeValue, ConstructorDef, MethodDef, Parameter, ParameterModifier,
    PropertyDef, ROOT_TYPE, TypeDef, TypeKind, TypeReference, strip_arity,
};
use refdoc_site::{LinkResolver, LinkTarget, ResolvedType};

/// Implicit base types never shown in a declaration.
const IMPLICIT_BASES: &[&str] = &[ROOT_TYPE, "System.ValueType", "System.Enum"];

/// Attribute types hidden from syntax blocks.
#[derive(Clone, Debug, Default)]
pub struct HiddenAttributes {
    names: HashSet<String>,
}

impl HiddenAttributes {
    /// Create a deny-list of attribute full names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True when the attribute must not be shown.
    pub fn is_hidden(&self, type_name: &str) -> bool {
        self.names.contains(type_name)
    }
}

/// Render a resolved type: anchor for linkable names, `&lt;…&gt;`
/// argument lists and array/pointer suffix.
pub fn render_resolved(resolved: &ResolvedType) -> String {
    let text = encode_text(&resolved.text);
    let mut html = match &resolved.target {
        LinkTarget::Local(url) => format!("<a href=\"{}\">{text}</a>", encode_double_quoted_attribute(url)),
        LinkTarget::External(url) => format!(
            "<a class=\"external\" href=\"{}\">{text}</a>",
            encode_double_quoted_attribute(url)
        ),
        LinkTarget::Unlinkable => text.into_owned(),
    };
    if !resolved.arguments.is_empty() {
        let arguments: Vec<String> = resolved.arguments.iter().map(render_resolved).collect();
        html.push_str("&lt;");
        html.push_str(&arguments.join(", "));
        html.push_str("&gt;");
    }
    html.push_str(&encode_text(&resolved.suffix));
    html
}

/// Prints types and member declarations with resolved links.
#[derive(Clone, Copy, Debug)]
pub struct TypePrinter<'r, 'a> {
    resolver: &'r LinkResolver<'a>,
    hidden: &'r HiddenAttributes,
}

impl<'r, 'a> TypePrinter<'r, 'a> {
    /// Create a printer linking through `resolver` and skipping `hidden`
    /// attributes.
    pub fn new(resolver: &'r LinkResolver<'a>, hidden: &'r HiddenAttributes) -> Self {
        Self { resolver, hidden }
    }

    /// Resolver used for links.
    pub fn resolver(&self) -> &'r LinkResolver<'a> {
        self.resolver
    }

    /// A type reference, linked where possible.
    pub fn type_ref(&self, reference: &TypeReference) -> String {
        render_resolved(&self.resolver.display(reference))
    }

    /// A documented type as a definition, e.g. `Container<T>`.
    pub fn type_def(&self, ty: &TypeDef) -> String {
        render_resolved(&self.resolver.display_type(ty))
    }

    /// Visible attributes, one `[Name(args)]` line each.
    pub fn attributes(&self, attributes: &[AttributeDef]) -> String {
        attributes
            .iter()
            .filter(|a| !self.hidden.is_hidden(&a.type_name))
            .map(|a| format!("{}\n", self.attribute(a)))
            .collect()
    }

    fn attribute(&self, attribute: &AttributeDef) -> String {
        let reference = TypeReference::named(attribute.type_name.clone());
        let mut resolved = self.resolver.display(&reference);
        if let Some(stripped) = resolved.text.strip_suffix("Attribute")
            && !stripped.is_empty()
        {
            resolved.text = stripped.to_owned();
        }

        let mut html = format!("[{}", render_resolved(&resolved));
        if !attribute.arguments.is_empty() {
            let arguments: Vec<String> = attribute
                .arguments
                .iter()
                .map(|arg| {
                    let value = encode_text(&attribute_value(&arg.value)).into_owned();
                    match &arg.name {
                        Some(name) => format!("{} = {value}", encode_text(name)),
                        None => value,
                    }
                })
                .collect();
            html.push('(');
            html.push_str(&arguments.join(", "));
            html.push(')');
        }
        html.push(']');
        html
    }

    /// Type declaration: `public class Circle : Shape, IShape`.
    pub fn type_syntax(&self, ty: &TypeDef) -> String {
        let mut html = self.attributes(&ty.attributes);
        html.push_str("public ");
        if ty.kind == TypeKind::Class {
            if ty.is_static {
                html.push_str("static ");
            } else if ty.is_abstract {
                html.push_str("abstract ");
            } else if ty.is_sealed {
                html.push_str("sealed ");
            }
        }
        html.push_str(ty.kind.keyword());
        html.push(' ');
        html.push_str(&encode_text(&declared_name(ty)));

        let mut supertypes = Vec::new();
        if let Some(base) = &ty.base
            && !base
                .canonical_name()
                .is_some_and(|name| IMPLICIT_BASES.contains(&name))
        {
            supertypes.push(self.type_ref(base));
        }
        supertypes.extend(ty.interfaces.iter().map(|i| self.type_ref(i)));
        if !supertypes.is_empty() {
            html.push_str(" : ");
            html.push_str(&supertypes.join(", "));
        }
        html
    }

    /// Constructor declaration: `public Circle(double radius)`.
    pub fn constructor_syntax(&self, owner: &TypeDef, ctor: &ConstructorDef) -> String {
        let mut html = self.attributes(&ctor.attributes);
        html.push_str(ctor.access.keyword());
        html.push(' ');
        html.push_str(&encode_text(&constructor_name(owner)));
        html.push_str(&self.parameters(&ctor.parameters, false));
        html
    }

    /// Property declaration: `public string Name { get; protected set; }`.
    pub fn property_syntax(&self, owner: &TypeDef, property: &PropertyDef) -> String {
        let in_interface = owner.kind == TypeKind::Interface;
        let access = property
            .getter
            .into_iter()
            .chain(property.setter)
            .reduce(Access::max)
            .unwrap_or_default();

        let mut html = self.attributes(&property.attributes);
        if !in_interface {
            html.push_str(access.keyword());
            html.push(' ');
            if property.is_static {
                html.push_str("static ");
            }
        }
        html.push_str(&self.type_ref(&property.property_type));
        html.push(' ');
        html.push_str(&encode_text(&property.name));
        html.push_str(" {");
        for (keyword, accessor) in [("get", property.getter), ("set", property.setter)] {
            let Some(accessor) = accessor else { continue };
            html.push(' ');
            if accessor != access && !in_interface {
                html.push_str(accessor.keyword());
                html.push(' ');
            }
            html.push_str(keyword);
            html.push(';');
        }
        html.push_str(" }");
        html
    }

    /// Method declaration: `public static string Alias(this Type type)`.
    pub fn method_syntax(&self, owner: &TypeDef, method: &MethodDef) -> String {
        let mut html = self.attributes(&method.attributes);
        if owner.kind != TypeKind::Interface {
            html.push_str(method.access.keyword());
            html.push(' ');
            if method.is_static {
                html.push_str("static ");
            }
            if method.is_abstract {
                html.push_str("abstract ");
            } else if method.is_override {
                html.push_str("override ");
            } else if method.is_virtual {
                html.push_str("virtual ");
            }
        }
        html.push_str(&self.type_ref(&method.return_type));
        html.push(' ');
        html.push_str(&encode_text(&method.name));
        if !method.generic_parameters.is_empty() {
            html.push_str("&lt;");
            html.push_str(&encode_text(&method.generic_parameters.join(", ")));
            html.push_str("&gt;");
        }
        html.push_str(&self.parameters(&method.parameters, method.is_extension));
        html
    }

    fn parameters(&self, parameters: &[Parameter], extension: bool) -> String {
        let rendered: Vec<String> = parameters
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = match p.modifier {
                    _ if extension && i == 0 => "this ",
                    ParameterModifier::Ref => "ref ",
                    ParameterModifier::Out => "out ",
                    ParameterModifier::Params => "params ",
                    ParameterModifier::None => "",
                };
                format!("{marker}{} {}", self.type_ref(&p.parameter_type), encode_text(&p.name))
            })
            .collect();
        format!("({})", rendered.join(", "))
    }
}

/// Declared name of a type: innermost nesting level, arity stripped,
/// generic parameters spelled out.
fn declared_name(ty: &TypeDef) -> String {
    let name = constructor_name(ty);
    if ty.generic_parameters.is_empty() {
        name
    } else {
        format!("{name}<{}>", ty.generic_parameters.join(", "))
    }
}

fn constructor_name(ty: &TypeDef) -> String {
    let innermost = ty.name.rsplit('+').next().unwrap_or(&ty.name);
    strip_arity(innermost)
}

fn attribute_value(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Bool(b) => b.to_string(),
        AttributeValue::Int(i) => i.to_string(),
        AttributeValue::Float(f) => f.to_string(),
        AttributeValue::Str(s) => format!("\"{s}\""),
    }
}
