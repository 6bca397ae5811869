//! CLI command implementations.

mod build;
mod check;

use std::path::{Path, PathBuf};

use refdoc_config::{CliSettings, Config};
use refdoc_model::{JsonSource, MetadataSource};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Load configuration and list the artifacts it names.
fn load_config(config_path: Option<&Path>, settings: &CliSettings) -> Result<Config, CliError> {
    let config = Config::load(config_path, Some(settings))?;
    tracing::debug!(config = ?config.config_path, artifacts = config.paths.artifacts.len(), "Loaded configuration");
    if config.paths.artifacts.is_empty() {
        return Err(CliError::Validation(
            "No artifacts given: pass artifact paths or set input.artifacts in refdoc.toml".to_owned(),
        ));
    }
    Ok(config)
}

/// One metadata source per configured artifact.
fn sources(config: &Config, output: &Output) -> Vec<Box<dyn MetadataSource>> {
    config
        .paths
        .artifacts
        .iter()
        .map(|path: &PathBuf| {
            output.info(&format!("Artifact: {}", path.display()));
            Box::new(JsonSource::new(path.clone())) as Box<dyn MetadataSource>
        })
        .collect()
}
