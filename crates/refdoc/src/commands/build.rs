//! `refdoc build` command implementation.

use std::path::PathBuf;

use clap::Args;
use refdoc_config::CliSettings;
use refdoc_html::{BuildConfig, StaticSiteBuilder};

use super::{load_config, sources};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Artifact descriptions to document (overrides config).
    pub(crate) artifacts: Vec<PathBuf>,

    /// Output directory for the generated site (default: site/).
    #[arg(short, long)]
    pub(crate) output_dir: Option<PathBuf>,

    /// Site title (overrides config).
    #[arg(long)]
    pub(crate) title: Option<String>,

    /// Write pages one at a time.
    #[arg(long)]
    pub(crate) sequential: bool,

    /// Path to configuration file (default: auto-discover refdoc.toml).
    #[arg(short, long, env = "REFDOC_CONFIG")]
    pub(crate) config: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            artifacts: Some(self.artifacts),
            output_dir: self.output_dir,
            title: self.title,
            parallel_writes: self.sequential.then_some(false),
        };
        let config = load_config(self.config.as_deref(), &cli_settings)?;
        let output_dir = config.paths.output_dir.clone();

        output.highlight(&format!("Building {}", config.site.title));
        let builder = StaticSiteBuilder::new(BuildConfig::from_config(&config)).with_sources(sources(&config, &output));
        output.info(&format!("Output: {}", output_dir.display()));

        let report = builder.build(&output_dir)?;

        output.success(&format!(
            "Site built successfully to {}: {} pages, {} namespaces, {} types",
            output_dir.display(),
            report.pages,
            report.namespaces,
            report.types
        ));
        Ok(())
    }
}
