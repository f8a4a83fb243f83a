//! Command-line exporter for `PopTracker` location packs.
//!
//! Reads authored location sources (tracker JSON that may contain whole-line
//! `//` comments), rebuilds the location tree, and writes the normalized
//! JSON the tracker loads. The written file is the artifact handed to the
//! release workflow; nothing else crosses that boundary.
//!
//! # Commands
//!
//! - `export <input> <output>` -- import, verify, and write tracker JSON.
//! - `check <input>` -- import and report where the output would differ
//!   from the source.

mod config;
mod error;
mod export;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::PackConfig;
use crate::error::PackError;

/// Default configuration file, looked up relative to the working directory.
const DEFAULT_CONFIG: &str = "poptracker-config.yaml";

#[derive(Parser)]
#[command(name = "poptracker-pack")]
#[command(about = "Export PopTracker location definitions", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a location source and write normalized tracker JSON
    Export {
        /// Authored location source (JSON with optional `//` comment lines)
        input: PathBuf,
        /// Where to write the tracker JSON
        output: PathBuf,
    },
    /// Check that exporting a location source keeps everything it says
    Check {
        /// Authored location source (JSON with optional `//` comment lines)
        input: PathBuf,
    },
}

/// Application entry point.
///
/// Initializes logging, loads configuration, and runs one command.
///
/// # Errors
///
/// Returns an error if configuration, import, verification, or writing fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    info!(
        config = %cli.config.display(),
        indent = ?config.output.indent,
        verify_round_trip = config.verify_round_trip,
        "configuration loaded"
    );

    match cli.command {
        Command::Export { input, output } => {
            let summary = export::export(&input, &output, &config)?;
            info!(
                output = %summary.output.display(),
                roots = summary.stats.roots,
                bytes = summary.bytes,
                "export complete"
            );
        }
        Command::Check { input } => {
            let report = export::check(&input)?;
            if let Some(err) = report.mismatch(&input) {
                return Err(err.into());
            }
            info!(
                input = %input.display(),
                locations = report.stats.locations,
                sections = report.stats.sections,
                "export matches source"
            );
        }
    }

    Ok(())
}

/// Load the configuration file, falling back to defaults when it is absent.
fn load_config(path: &Path) -> Result<PackConfig, PackError> {
    if path.exists() {
        Ok(PackConfig::from_file(path)?)
    } else {
        info!(config = %path.display(), "config file not found, using defaults");
        let mut config = PackConfig::default();
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }
}
