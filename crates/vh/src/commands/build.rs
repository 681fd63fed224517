//! `vh build` command implementation.

use std::path::PathBuf;

use clap::Args;
use vh_config::{CliSettings, Config};
use vh_site::SiteBuilder;

use super::{ModeArg, ProjectArg, build_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover vh.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Help source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for rendered pages (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Page addressing mode (overrides config).
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Documentation project (overrides config).
    #[arg(long, value_enum)]
    project: Option<ProjectArg>,

    /// Enable verbose output (show timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or the site build fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            mode: self.mode.map(Into::into),
            project: self.project.map(Into::into),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build_config = build_config(&config);
        tracing::debug!(
            config_path = ?config.config_path,
            mode = ?build_config.options.mode,
            project = build_config.options.project.name(),
            "Configuration loaded"
        );

        output.info(&format!("Source: {}", build_config.source_dir.display()));
        output.info(&format!("Output: {}", build_config.output_dir.display()));

        let output_dir = build_config.output_dir.clone();
        let report = SiteBuilder::new(build_config).build()?;

        output.build_report(&report, &output_dir);
        Ok(())
    }
}
