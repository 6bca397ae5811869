//! `refdoc check` command implementation.

use std::path::PathBuf;

use clap::Args;
use refdoc_config::CliSettings;
use refdoc_html::{BuildConfig, StaticSiteBuilder};

use super::{load_config, sources};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Artifact descriptions to check (overrides config).
    pub(crate) artifacts: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover refdoc.toml).
    #[arg(short, long, env = "REFDOC_CONFIG")]
    pub(crate) config: Option<PathBuf>,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            artifacts: Some(self.artifacts),
            ..CliSettings::default()
        };
        let config = load_config(self.config.as_deref(), &cli_settings)?;

        let report = StaticSiteBuilder::new(BuildConfig::from_config(&config))
            .with_sources(sources(&config, &output))
            .check()?;

        output.success(&format!(
            "Site model OK: {} pages, {} namespaces, {} types",
            report.pages, report.namespaces, report.types
        ));
        Ok(())
    }
}
