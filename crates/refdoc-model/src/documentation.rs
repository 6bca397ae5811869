//! The documented set: every type of every loaded assembly.

use std::collections::HashMap;

use crate::entity::{Assembly, TypeDef};
use crate::reference::TypeReference;
use crate::source::{MetadataError, MetadataSource};

/// Namespace and the types it declares, in declaration order.
#[derive(Debug)]
pub struct Namespace {
    /// Namespace name (empty for the global namespace).
    pub name: String,
    /// Declared types.
    pub types: Vec<TypeDef>,
}

/// Read-only view over the documented types.
///
/// Namespaces keep the order in which they first appear across the loaded
/// assemblies; types keep their declaration order within a namespace.
#[derive(Debug, Default)]
pub struct Documentation {
    assemblies: Vec<String>,
    namespaces: Vec<Namespace>,
    /// Full name to (namespace index, type index). First declaration wins.
    index: HashMap<String, (usize, usize)>,
}

impl Documentation {
    /// Build the documented set from loaded assemblies.
    ///
    /// Types sharing a full name across assemblies are all kept; lookups
    /// resolve to the first one, and page naming reports the duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::InvalidModel`] for a type without a name.
    pub fn from_assemblies(assemblies: Vec<Assembly>) -> Result<Self, MetadataError> {
        let mut doc = Self::default();
        let mut namespace_index: HashMap<String, usize> = HashMap::new();

        for assembly in assemblies {
            for ty in assembly.types {
                if ty.name.trim().is_empty() {
                    return Err(MetadataError::InvalidModel(format!(
                        "type without a name in namespace '{}' of assembly '{}'",
                        ty.namespace, assembly.name
                    )));
                }

                let ns = *namespace_index
                    .entry(ty.namespace.clone())
                    .or_insert_with(|| {
                        doc.namespaces.push(Namespace {
                            name: ty.namespace.clone(),
                            types: Vec::new(),
                        });
                        doc.namespaces.len() - 1
                    });
                let types = &mut doc.namespaces[ns].types;
                doc.index.entry(ty.full_name()).or_insert((ns, types.len()));
                types.push(ty);
            }
            doc.assemblies.push(assembly.name);
        }

        Ok(doc)
    }

    /// Load every source and build the documented set.
    ///
    /// Fails before anything else happens if any source fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`MetadataError`] raised by a source.
    pub fn load(sources: &[Box<dyn MetadataSource>]) -> Result<Self, MetadataError> {
        let assemblies = sources
            .iter()
            .map(|source| {
                tracing::debug!(origin = %source.origin(), "Loading metadata");
                source.load()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_assemblies(assemblies)
    }

    /// Names of the loaded assemblies.
    pub fn assemblies(&self) -> &[String] {
        &self.assemblies
    }

    /// Namespaces in first-appearance order.
    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Types declared in the named namespace.
    pub fn types_in(&self, namespace: &str) -> &[TypeDef] {
        self.namespaces
            .iter()
            .find(|ns| ns.name == namespace)
            .map(|ns| ns.types.as_slice())
            .unwrap_or_default()
    }

    /// Every documented type, namespace by namespace.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.namespaces.iter().flat_map(|ns| ns.types.iter())
    }

    /// Number of documented types.
    pub fn type_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.types.len()).sum()
    }

    /// Look up a documented type by full name.
    pub fn find_type(&self, full_name: &str) -> Option<&TypeDef> {
        self.index
            .get(full_name)
            .map(|&(ns, ty)| &self.namespaces[ns].types[ty])
    }

    /// Canonicalize a reference to its documented generic definition.
    ///
    /// Closed instantiations resolve to their definition; array, by-ref,
    /// pointer and generic-parameter references do not name a type and
    /// return `None`, as do external types.
    pub fn normalize(&self, reference: &TypeReference) -> Option<&TypeDef> {
        reference
            .canonical_name()
            .and_then(|name| self.find_type(name))
    }

    /// True when the reference names a documented type.
    pub fn is_local(&self, reference: &TypeReference) -> bool {
        self.normalize(reference).is_some()
    }

    /// Documented base type of `ty`, if its base is local.
    pub fn base_type(&self, ty: &TypeDef) -> Option<&TypeDef> {
        ty.base.as_ref().and_then(|base| self.normalize(base))
    }

    /// Documented interfaces `ty` implements directly.
    pub fn interfaces<'a>(&'a self, ty: &'a TypeDef) -> impl Iterator<Item = &'a TypeDef> + 'a {
        ty.interfaces
            .iter()
            .filter_map(|interface| self.normalize(interface))
    }
}
