//! Loading assemblies from compiled-artifact descriptions.

use std::path::{Path, PathBuf};

use crate::entity::Assembly;
use crate::xmldoc::XmlDocs;

/// Error loading or validating metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Artifact file not found.
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error reading an artifact or sidecar.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Artifact is not a valid assembly description.
    #[error("Invalid artifact {}: {source}", path.display())]
    Json {
        /// Artifact path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Documentation sidecar is not well-formed XML.
    #[error("Invalid documentation file {}: {source}", path.display())]
    Xml {
        /// Sidecar path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: quick_xml::Error,
    },
    /// Model violates a structural rule.
    #[error("Invalid metadata: {0}")]
    InvalidModel(String),
}

/// Provider of assembly metadata.
///
/// Implementations must be pure: loading twice yields the same assembly.
pub trait MetadataSource: Send + Sync {
    /// Load the assembly with summaries attached.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] if the artifact cannot be read or is corrupt.
    fn load(&self) -> Result<Assembly, MetadataError>;

    /// Human-readable origin for log messages.
    fn origin(&self) -> String;
}

/// Assembly described by a JSON artifact, with an optional XML
/// documentation sidecar (`Shapes.json` + `Shapes.xml`).
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    /// Create a source reading the artifact at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Artifact path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Documentation sidecar next to the artifact, if present.
    fn sidecar(&self) -> Option<PathBuf> {
        ["xml", "XML"]
            .into_iter()
            .map(|ext| self.path.with_extension(ext))
            .find(|candidate| candidate.is_file())
    }

    fn read(path: &Path) -> Result<String, MetadataError> {
        std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl MetadataSource for JsonSource {
    fn load(&self) -> Result<Assembly, MetadataError> {
        if !self.path.exists() {
            return Err(MetadataError::NotFound(self.path.clone()));
        }

        let content = Self::read(&self.path)?;
        let mut assembly: Assembly =
            serde_json::from_str(&content).map_err(|source| MetadataError::Json {
                path: self.path.clone(),
                source,
            })?;

        if assembly.name.is_empty() {
            assembly.name = self
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        match self.sidecar() {
            Some(sidecar) => {
                let xml = Self::read(&sidecar)?;
                let docs = XmlDocs::parse(&xml).map_err(|source| MetadataError::Xml {
                    path: sidecar.clone(),
                    source,
                })?;
                tracing::debug!(path = %sidecar.display(), members = docs.len(), "Loaded documentation file");
                docs.apply(&mut assembly);
            }
            None => {
                tracing::warn!(
                    artifact = %self.path.display(),
                    "No XML documentation file found, summaries limited to the artifact"
                );
            }
        }

        tracing::info!(assembly = %assembly.name, types = assembly.types.len(), "Loaded assembly");
        Ok(assembly)
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}
