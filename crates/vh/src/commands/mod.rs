//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod tags;

use clap::ValueEnum;
use vh_config::Config;
use vh_renderer::{Project, RenderMode};
use vh_site::BuildConfig;

pub(crate) use build::BuildArgs;
pub(crate) use tags::TagsArgs;

/// `--mode` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
    /// `help.txt` is served as `/`.
    Online,
    /// Every page is addressed as `<file>.html`.
    Offline,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Online => Self::Online,
            ModeArg::Offline => Self::Offline,
        }
    }
}

/// `--project` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ProjectArg {
    Vim,
    Neovim,
}

impl From<ProjectArg> for Project {
    fn from(project: ProjectArg) -> Self {
        match project {
            ProjectArg::Vim => Self::Vim,
            ProjectArg::Neovim => Self::Neovim,
        }
    }
}

/// Site build configuration from loaded settings.
pub(crate) fn build_config(config: &Config) -> BuildConfig {
    BuildConfig {
        source_dir: config.docs_resolved.source_dir.clone(),
        output_dir: config.docs_resolved.output_dir.clone(),
        options: config.site.converter_options(),
        scan_tags: config.site.scan_tags,
        sitemap: config.site.sitemap,
        base_url: config.site.base_url(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_arg_conversions() {
        assert_eq!(RenderMode::from(ModeArg::Offline), RenderMode::Offline);
        assert_eq!(Project::from(ProjectArg::Neovim), Project::Neovim);
    }

    #[test]
    fn test_build_config_from_config() {
        let mut config = Config::default();
        config.docs_resolved.source_dir = PathBuf::from("/src/doc");
        config.site.project = Project::Neovim;
        let build = build_config(&config);
        assert_eq!(build.source_dir, PathBuf::from("/src/doc"));
        assert_eq!(build.options.project, Project::Neovim);
        assert_eq!(build.base_url, "https://neo.vimhelp.org/");
        assert!(build.scan_tags);
    }
}
