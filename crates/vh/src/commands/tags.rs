//! `vh tags` command implementation.

use std::path::PathBuf;

use clap::Args;
use console::Term;
use vh_config::{CliSettings, Config};
use vh_site::SiteBuilder;

use super::build_config;
use crate::error::CliError;

/// Arguments for the tags command.
#[derive(Args)]
pub(crate) struct TagsArgs {
    /// Path to configuration file (default: auto-discover vh.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Help source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl TagsArgs {
    /// Print every tag and its destination, sorted by tag.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, document loading or
    /// writing to stdout fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let (_, index) = SiteBuilder::new(build_config(&config)).load_index()?;

        let term = Term::stdout();
        for (tag, href) in index.all_entries_sorted() {
            term.write_line(&format!("{tag}\t{href}"))?;
        }
        Ok(())
    }
}
