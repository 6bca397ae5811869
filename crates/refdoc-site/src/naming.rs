//! Page identities.
//!
//! Every page of the site is named by a [`Slug`]: a prefix telling the kind
//! of entity (`N_`, `T_`, `P_`, `M_`, `C_`) followed by the canonical full
//! name of the entity. Slugs are stable across runs and unique across the
//! documented set:
//!
//! - `N_Shapes` - namespace
//! - `N_Shapes-extensions` - extension methods of a namespace
//! - ``T_Shapes.Container`1`` - type, always named by its generic definition
//! - `T_Shapes.Circle-methods` - member group of a type
//! - `P_Shapes.Circle.Radius` - property
//! - `M_Shapes.Circle.Scale-double` - overloaded method with fingerprint
//! - ``M_Shapes.Factory.Create``1-`` - overloaded generic method
//! - `C_Shapes.Circle.ctor` - constructor
//!
//! Type identifiers never contain `-`, so suffixed and fingerprinted slugs
//! cannot collide with plain ones.

use std::collections::HashMap;
use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_encode};
use refdoc_model::{ConstructorDef, MethodDef, Parameter, PropertyDef, TypeDef, TypeReference, alias};

use crate::error::SiteError;

/// Characters escaped in file names: reserved on common filesystems, plus `%`
/// so the escaping stays reversible.
const FILE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b'%')
    .add(b'*')
    .add(b':')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'|')
    .add(b'?')
    .add(b'\\')
    .add(b'/');

/// URL unreserved characters: A-Z a-z 0-9 - . _ ~
const HREF_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Slug of the documentation root page.
pub const ROOT_SLUG: &str = "index";

/// Identity of a page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slug(String);

impl Slug {
    /// Wrap a raw slug.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Slug of the documentation root.
    pub fn root() -> Self {
        Self::new(ROOT_SLUG)
    }

    /// Raw slug, as used in diagnostics.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the page with the given extension.
    ///
    /// ``T_Shapes.Container`1`` stays ``T_Shapes.Container`1.html``; only
    /// characters reserved on filesystems are escaped.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{extension}", percent_encode(self.0.as_bytes(), FILE_ENCODE_SET))
    }

    /// Relative URL of the page: its file name, percent-encoded.
    ///
    /// Decoding the href yields [`Slug::file_name`].
    pub fn href(&self, extension: &str) -> String {
        percent_encode(self.file_name(extension).as_bytes(), HREF_ENCODE_SET).to_string()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of member grouped on its own page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Constructors.
    Constructor,
    /// Properties.
    Property,
    /// Methods.
    Method,
}

impl MemberKind {
    /// All grouped kinds, in page order.
    pub const ALL: [Self; 3] = [Self::Constructor, Self::Property, Self::Method];

    /// Group label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Constructor => "Constructors",
            Self::Property => "Properties",
            Self::Method => "Methods",
        }
    }

    fn group_suffix(self) -> &'static str {
        match self {
            Self::Constructor => "constructors",
            Self::Property => "properties",
            Self::Method => "methods",
        }
    }
}

/// Namespace page.
pub fn namespace_slug(namespace: &str) -> Slug {
    Slug(format!("N_{namespace}"))
}

/// Extension methods page of a namespace.
pub fn extensions_slug(namespace: &str) -> Slug {
    Slug(format!("N_{namespace}-extensions"))
}

/// Type page, named by the type's full name.
///
/// Types are stored as definitions, so every closed instantiation of a
/// generic type resolves here through its definition.
pub fn type_slug(ty: &TypeDef) -> Slug {
    type_slug_for(&ty.full_name())
}

/// Type page for a canonical full name.
pub fn type_slug_for(full_name: &str) -> Slug {
    Slug(format!("T_{full_name}"))
}

/// Member group page of a type.
pub fn group_slug(ty: &TypeDef, kind: MemberKind) -> Slug {
    Slug(format!("T_{}-{}", ty.full_name(), kind.group_suffix()))
}

/// Property page.
pub fn property_slug(owner: &TypeDef, property: &PropertyDef) -> Slug {
    Slug(format!("P_{}.{}", owner.full_name(), property.name))
}

/// Method page.
///
/// The method fingerprint is appended only when the owner declares more
/// than one method with the same name.
pub fn method_slug(owner: &TypeDef, method: &MethodDef) -> Slug {
    let overloads = owner.methods.iter().filter(|m| m.name == method.name).count();
    if overloads > 1 {
        Slug(format!("M_{}.{}", owner.full_name(), method_fingerprint(method)))
    } else {
        Slug(format!("M_{}.{}", owner.full_name(), method.name))
    }
}

/// Name, generic arity and parameter fingerprint of a method.
///
/// Generic methods carry their arity as in documentation IDs, so `Create()`
/// is `Create-` and `Create<T>()` is ``Create``1-``.
pub fn method_fingerprint(method: &MethodDef) -> String {
    let parameters = fingerprint(&method.parameters);
    match method.generic_parameters.len() {
        0 => format!("{}-{parameters}", method.name),
        arity => format!("{}``{arity}-{parameters}", method.name),
    }
}

/// Constructor page, fingerprinted when the owner has several constructors.
pub fn constructor_slug(owner: &TypeDef, ctor: &ConstructorDef) -> Slug {
    let base = format!("C_{}.ctor", owner.full_name());
    if owner.constructors.len() > 1 {
        Slug(format!("{base}-{}", fingerprint(&ctor.parameters)))
    } else {
        Slug(base)
    }
}

/// Ordered parameter type names, comma separated.
///
/// Aliased primitives use their keyword: `Scale(double, Shapes.Circle)` is
/// `double,Shapes.Circle`.
pub fn fingerprint(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| type_fingerprint(&p.parameter_type))
        .collect::<Vec<_>>()
        .join(",")
}

/// Fingerprint of a single type reference.
///
/// Generic arguments are braced so their separators never merge with the
/// parameter list: ``Tuple`1<int>, string`` is `System.Tuple{int},string`.
pub fn type_fingerprint(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Named(name) => alias(name).map_or_else(|| name.clone(), str::to_owned),
        TypeReference::GenericParameter(name) => name.clone(),
        TypeReference::Array(element) => format!("{}[]", type_fingerprint(element)),
        TypeReference::ByRef(element) => format!("{}&", type_fingerprint(element)),
        TypeReference::Pointer(element) => format!("{}*", type_fingerprint(element)),
        TypeReference::GenericInstance { definition, arguments } => {
            let definition = definition.split('`').next().unwrap_or(definition);
            let arguments: Vec<String> = arguments.iter().map(type_fingerprint).collect();
            format!("{definition}{{{}}}", arguments.join(","))
        }
    }
}

/// Tracks every slug placed in the site.
///
/// Two entities claiming the same slug would overwrite each other's page,
/// so a repeat claim is an error. Slugs are compared case-insensitively:
/// `T_Shapes.Circle` and `T_Shapes.circle` share a file on case-insensitive
/// filesystems.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    claimed: HashMap<String, (Slug, String)>,
}

impl SlugRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `slug` for the entity described by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NamingCollision`] if the slug is already claimed
    /// and [`SiteError::CaseCollision`] if a slug differing only in case is.
    pub fn claim(&mut self, slug: &Slug, owner: impl Into<String>) -> Result<(), SiteError> {
        let owner = owner.into();
        let key = slug.as_str().to_lowercase();
        if let Some((first_slug, first)) = self.claimed.get(&key) {
            if first_slug == slug {
                return Err(SiteError::NamingCollision {
                    slug: slug.to_string(),
                    first: first.clone(),
                    second: owner,
                });
            }
            return Err(SiteError::CaseCollision {
                first_slug: first_slug.to_string(),
                first: first.clone(),
                second_slug: slug.to_string(),
                second: owner,
            });
        }
        self.claimed.insert(key, (slug.clone(), owner));
        Ok(())
    }

    /// Number of claimed slugs.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// True when nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle() -> TypeDef {
        TypeDef::class("Shapes", "Circle")
            .with_property(PropertyDef::new("Radius", TypeReference::named("System.Double")))
            .with_method(MethodDef::new(
                "Scale",
                vec![Parameter::new("factor", TypeReference::named("System.Int32"))],
            ))
            .with_method(MethodDef::new(
                "Scale",
                vec![Parameter::new("factor", TypeReference::named("System.String"))],
            ))
            .with_method(MethodDef::new("Area", vec![]))
    }

    #[test]
    fn test_namespace_slug() {
        assert_eq!(namespace_slug("Shapes").as_str(), "N_Shapes");
        assert_eq!(namespace_slug("").as_str(), "N_");
        assert_eq!(extensions_slug("Shapes").as_str(), "N_Shapes-extensions");
    }

    #[test]
    fn test_type_slug_uses_definition_name() {
        let container = TypeDef::class("Shapes", "Container`1").with_generic_parameters(&["T"]);
        assert_eq!(type_slug(&container).as_str(), "T_Shapes.Container`1");
        assert_eq!(type_slug(&container), type_slug_for("Shapes.Container`1"));
    }

    #[test]
    fn test_overloads_get_distinct_slugs() {
        let circle = circle();
        let by_int = method_slug(&circle, &circle.methods[0]);
        let by_string = method_slug(&circle, &circle.methods[1]);
        let area = method_slug(&circle, &circle.methods[2]);

        assert_eq!(by_int.as_str(), "M_Shapes.Circle.Scale-int");
        assert_eq!(by_string.as_str(), "M_Shapes.Circle.Scale-string");
        assert_eq!(area.as_str(), "M_Shapes.Circle.Area");
        assert_ne!(by_int, by_string);
    }

    #[test]
    fn test_property_slug() {
        let circle = circle();
        assert_eq!(
            property_slug(&circle, &circle.properties[0]).as_str(),
            "P_Shapes.Circle.Radius"
        );
    }

    #[test]
    fn test_constructor_slugs() {
        let single = TypeDef::class("Shapes", "Circle").with_constructor(ConstructorDef::new(vec![]));
        assert_eq!(
            constructor_slug(&single, &single.constructors[0]).as_str(),
            "C_Shapes.Circle.ctor"
        );

        let overloaded = TypeDef::class("Shapes", "Circle")
            .with_constructor(ConstructorDef::new(vec![]))
            .with_constructor(ConstructorDef::new(vec![Parameter::new(
                "radius",
                TypeReference::named("System.Double"),
            )]));
        let a = constructor_slug(&overloaded, &overloaded.constructors[0]);
        let b = constructor_slug(&overloaded, &overloaded.constructors[1]);
        assert_eq!(a.as_str(), "C_Shapes.Circle.ctor-");
        assert_eq!(b.as_str(), "C_Shapes.Circle.ctor-double");
    }

    #[test]
    fn test_group_slugs() {
        let circle = circle();
        assert_eq!(
            group_slug(&circle, MemberKind::Property).as_str(),
            "T_Shapes.Circle-properties"
        );
        assert_eq!(
            group_slug(&circle, MemberKind::Method).as_str(),
            "T_Shapes.Circle-methods"
        );
    }

    #[test]
    fn test_fingerprint_generic_instance() {
        let parameters = vec![
            Parameter::new("container", TypeReference::named("Printing.ITypeContainer")),
            Parameter::new(
                "predicate",
                TypeReference::instance("System.Predicate`1", vec![TypeReference::named("Printing.TypeElement")]),
            ),
        ];
        assert_eq!(
            fingerprint(&parameters),
            "Printing.ITypeContainer,System.Predicate{Printing.TypeElement}"
        );
    }

    #[test]
    fn test_fingerprint_separates_generic_arguments() {
        let int = TypeReference::named("System.Int32");
        let string = TypeReference::named("System.String");
        let split = vec![
            Parameter::new("pair", TypeReference::instance("System.Tuple`1", vec![int.clone()])),
            Parameter::new("name", string.clone()),
        ];
        let nested = vec![Parameter::new(
            "pair",
            TypeReference::instance("System.Tuple`2", vec![int, string]),
        )];

        assert_eq!(fingerprint(&split), "System.Tuple{int},string");
        assert_eq!(fingerprint(&nested), "System.Tuple{int,string}");
    }

    #[test]
    fn test_generic_method_overloads_get_distinct_slugs() {
        let factory = TypeDef::class("Shapes", "Factory")
            .with_method(MethodDef::new("Create", vec![]))
            .with_method(MethodDef {
                generic_parameters: vec!["T".to_owned()],
                ..MethodDef::new("Create", vec![])
            });

        let plain = method_slug(&factory, &factory.methods[0]);
        let generic = method_slug(&factory, &factory.methods[1]);

        assert_eq!(plain.as_str(), "M_Shapes.Factory.Create-");
        assert_eq!(generic.as_str(), "M_Shapes.Factory.Create``1-");
    }

    #[test]
    fn test_fingerprint_wrapped_types() {
        assert_eq!(
            type_fingerprint(&TypeReference::array_of(TypeReference::generic_parameter("T"))),
            "T[]"
        );
        assert_eq!(
            type_fingerprint(&TypeReference::by_ref(TypeReference::named("System.Int32"))),
            "int&"
        );
        assert_eq!(
            type_fingerprint(&TypeReference::pointer_to(TypeReference::named("System.Byte"))),
            "byte*"
        );
    }

    #[test]
    fn test_file_name_and_href() {
        let slug = type_slug_for("Shapes.Container`1");
        assert_eq!(slug.file_name("html"), "T_Shapes.Container`1.html");
        assert_eq!(slug.href("html"), "T_Shapes.Container%601.html");
    }

    #[test]
    fn test_href_decodes_to_file_name() {
        let slug = Slug::new("M_Shapes.Buffer.Read-byte*,int&");
        let file_name = slug.file_name("html");
        assert_eq!(file_name, "M_Shapes.Buffer.Read-byte%2A,int&.html");

        let href = slug.href("html");
        let decoded = percent_encoding::percent_decode_str(&href).decode_utf8().unwrap();
        assert_eq!(decoded, file_name);
    }

    #[test]
    fn test_registry_rejects_repeat() {
        let mut registry = SlugRegistry::new();
        let slug = type_slug_for("Shapes.Circle");
        registry.claim(&slug, "type Shapes.Circle (Shapes)").unwrap();

        let err = registry.claim(&slug, "type Shapes.Circle (Shapes.Extra)").unwrap_err();

        assert!(err.to_string().contains("T_Shapes.Circle"));
        assert!(err.to_string().contains("Shapes.Extra"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_rejects_case_only_difference() {
        let mut registry = SlugRegistry::new();
        registry
            .claim(&type_slug_for("Shapes.Circle"), "type Shapes.Circle")
            .unwrap();

        let err = registry
            .claim(&type_slug_for("Shapes.circle"), "type Shapes.circle")
            .unwrap_err();

        assert!(matches!(err, SiteError::CaseCollision { .. }));
        assert!(err.to_string().contains("T_Shapes.Circle"));
        assert!(err.to_string().contains("T_Shapes.circle"));
        assert_eq!(registry.len(), 1);
    }
}
