//! Locality and link resolution for type references.
//!
//! A reference resolves to one of three targets:
//!
//! - [`LinkTarget::Local`] when its (canonicalized) type is documented
//! - [`LinkTarget::External`] when it lives in a well-known namespace
//! - [`LinkTarget::Unlinkable`] otherwise, rendered as plain text
//!
//! Resolution is a pure function of the documented set and the link
//! settings, so navigation and page bodies always agree on targets.

use refdoc_config::LinksConfig;
use refdoc_model::{
    Documentation, TypeDef, TypeReference, display_full_name, namespace_of, short_name,
};

use crate::naming::{Slug, type_slug};

/// Disposition of a type reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinkTarget {
    /// Page of the documented set (relative href).
    Local(String),
    /// External reference URL.
    External(String),
    /// No link; display text only.
    Unlinkable,
}

impl LinkTarget {
    /// Link URL, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Local(url) | Self::External(url) => Some(url),
            Self::Unlinkable => None,
        }
    }
}

/// Display form of a resolved reference.
///
/// `List<Circle>[]` resolves to text `List` (external), one argument
/// `Circle` (local) and suffix `[]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    /// Display name.
    pub text: String,
    /// Link for the name.
    pub target: LinkTarget,
    /// Generic arguments, each resolved independently.
    pub arguments: Vec<ResolvedType>,
    /// Array and pointer markers, display only.
    pub suffix: String,
}

impl ResolvedType {
    fn plain(text: impl Into<String>, target: LinkTarget) -> Self {
        Self {
            text: text.into(),
            target,
            arguments: Vec::new(),
            suffix: String::new(),
        }
    }

    /// Display text without markup: `List<Circle>[]`.
    pub fn plain_text(&self) -> String {
        let mut text = self.text.clone();
        if !self.arguments.is_empty() {
            let arguments: Vec<String> = self.arguments.iter().map(Self::plain_text).collect();
            text.push('<');
            text.push_str(&arguments.join(", "));
            text.push('>');
        }
        text.push_str(&self.suffix);
        text
    }
}

/// Well-known external namespaces and their reference URL template.
#[derive(Clone, Debug)]
pub struct ExternalLinks {
    namespaces: Vec<String>,
    template: String,
}

impl Default for ExternalLinks {
    fn default() -> Self {
        Self::from(&LinksConfig::default())
    }
}

impl From<&LinksConfig> for ExternalLinks {
    fn from(config: &LinksConfig) -> Self {
        Self::new(config.well_known_namespaces.clone(), config.external_url.clone())
    }
}

impl ExternalLinks {
    /// Create link settings.
    ///
    /// `template` contains a `{name}` placeholder; a namespace also covers
    /// its child namespaces.
    pub fn new(namespaces: Vec<String>, template: impl Into<String>) -> Self {
        Self {
            namespaces,
            template: template.into(),
        }
    }

    /// True when the type lives in a well-known namespace.
    pub fn is_well_known(&self, full_name: &str) -> bool {
        let ns = namespace_of(full_name);
        self.namespaces.iter().any(|known| {
            ns == known
                || ns
                    .strip_prefix(known.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// External reference URL for a type.
    ///
    /// ``System.Collections.Generic.List`1`` becomes
    /// `.../system.collections.generic.list-1`.
    pub fn url(&self, full_name: &str) -> String {
        let name = full_name.to_lowercase().replace('`', "-").replace('+', ".");
        self.template.replace("{name}", &name)
    }
}

/// Resolves type references against the documented set.
#[derive(Debug)]
pub struct LinkResolver<'a> {
    doc: &'a Documentation,
    external: ExternalLinks,
    extension: String,
}

impl<'a> LinkResolver<'a> {
    /// Create a resolver producing hrefs with the given page extension.
    pub fn new(doc: &'a Documentation, external: ExternalLinks, extension: impl Into<String>) -> Self {
        Self {
            doc,
            external,
            extension: extension.into(),
        }
    }

    /// Documented set being resolved against.
    pub fn documentation(&self) -> &'a Documentation {
        self.doc
    }

    /// Page extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Relative href of a page.
    pub fn href(&self, slug: &Slug) -> String {
        slug.href(&self.extension)
    }

    /// Link target of a reference.
    ///
    /// Arrays, by-refs and pointers resolve through their element type;
    /// closed generic instantiations through their definition.
    pub fn resolve(&self, reference: &TypeReference) -> LinkTarget {
        match reference {
            TypeReference::GenericParameter(_) => LinkTarget::Unlinkable,
            TypeReference::Array(element)
            | TypeReference::ByRef(element)
            | TypeReference::Pointer(element) => self.resolve(element),
            TypeReference::Named(name) | TypeReference::GenericInstance { definition: name, .. } => {
                self.resolve_name(name)
            }
        }
    }

    /// Link target of a type by canonical full name.
    pub fn resolve_name(&self, full_name: &str) -> LinkTarget {
        if let Some(ty) = self.doc.find_type(full_name) {
            self.type_target(ty)
        } else if self.external.is_well_known(full_name) {
            LinkTarget::External(self.external.url(full_name))
        } else {
            LinkTarget::Unlinkable
        }
    }

    /// Local link to a documented type.
    pub fn type_target(&self, ty: &TypeDef) -> LinkTarget {
        LinkTarget::Local(self.href(&type_slug(ty)))
    }

    /// Display form of a reference.
    ///
    /// Linked types show their short name, unlinkable ones their full
    /// name; aliased primitives always show the keyword.
    pub fn display(&self, reference: &TypeReference) -> ResolvedType {
        match reference {
            TypeReference::GenericParameter(name) => ResolvedType::plain(name.clone(), LinkTarget::Unlinkable),
            TypeReference::Array(element) => self.display_wrapped(element, "[]"),
            TypeReference::Pointer(element) => self.display_wrapped(element, "*"),
            TypeReference::ByRef(element) => self.display(element),
            TypeReference::Named(name) => {
                let mut resolved = self.display_name(name);
                if let Some(ty) = self.doc.find_type(name) {
                    resolved.arguments = ty
                        .generic_parameters
                        .iter()
                        .map(|p| ResolvedType::plain(p.clone(), LinkTarget::Unlinkable))
                        .collect();
                }
                resolved
            }
            TypeReference::GenericInstance { definition, arguments } => {
                let mut resolved = self.display_name(definition);
                resolved.arguments = arguments.iter().map(|a| self.display(a)).collect();
                resolved
            }
        }
    }

    /// Display form of a documented type as a definition: `Container<T>`.
    pub fn display_type(&self, ty: &TypeDef) -> ResolvedType {
        self.display(&TypeReference::named(ty.full_name()))
    }

    fn display_wrapped(&self, element: &TypeReference, marker: &str) -> ResolvedType {
        let mut resolved = self.display(element);
        resolved.suffix.push_str(marker);
        resolved
    }

    fn display_name(&self, full_name: &str) -> ResolvedType {
        let target = self.resolve_name(full_name);
        let text = match target {
            LinkTarget::Unlinkable => display_full_name(full_name),
            LinkTarget::Local(_) | LinkTarget::External(_) => short_name(full_name),
        };
        ResolvedType::plain(text, target)
    }
}
