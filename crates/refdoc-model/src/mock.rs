//! Mock metadata source for testing.
//!
//! Provides [`MockSource`] for unit testing without artifact files.

use crate::entity::{Assembly, TypeDef};
use crate::source::{MetadataError, MetadataSource};

/// In-memory metadata source.
///
/// # Example
///
/// ```ignore
/// use refdoc_model::{MetadataSource, MockSource, TypeDef};
///
/// let source = MockSource::new("Shapes").with_type(TypeDef::class("Shapes", "Circle"));
/// let assembly = source.load()?;
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    assembly: Assembly,
    failure: Option<String>,
}

impl MockSource {
    /// Create an empty assembly source.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            assembly: Assembly::new(name, Vec::new()),
            failure: None,
        }
    }

    /// Add a type to the assembly.
    #[must_use]
    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.assembly.types.push(ty);
        self
    }

    /// Make `load` fail with an invalid-model error.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

impl MetadataSource for MockSource {
    fn load(&self) -> Result<Assembly, MetadataError> {
        match &self.failure {
            Some(message) => Err(MetadataError::InvalidModel(message.clone())),
            None => Ok(self.assembly.clone()),
        }
    }

    fn origin(&self) -> String {
        format!("mock:{}", self.assembly.name)
    }
}
