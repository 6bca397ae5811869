//! refdoc CLI - API reference site generator.
//!
//! Provides commands for:
//! - `build`: Generate the reference site from compiled artifacts
//! - `check`: Build the site model and report problems without writing

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs};
use output::Output;

/// refdoc - API reference site generator.
#[derive(Parser)]
#[command(name = "refdoc", version, about)]
struct Cli {
    /// Enable informational logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the reference site.
    Build(BuildArgs),
    /// Validate artifacts and the site model without writing output.
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build_with_overrides() {
        let cli = Cli::try_parse_from([
            "refdoc",
            "build",
            "Shapes.json",
            "Printing.json",
            "-o",
            "out",
            "--sequential",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(
            args.artifacts,
            vec![PathBuf::from("Shapes.json"), PathBuf::from("Printing.json")]
        );
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.sequential);
    }

    #[test]
    fn test_parse_check_without_artifacts() {
        let cli = Cli::try_parse_from(["refdoc", "check"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert!(args.artifacts.is_empty());
    }
}
