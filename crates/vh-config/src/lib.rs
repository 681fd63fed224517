//! Configuration management for vimhelp site builds.
//!
//! Parses `vh.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `docs.source_dir`, `docs.output_dir`, `site.version` and `site.base_url`
//! support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use vh_renderer::{ConverterOptions, Project, RenderMode};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override help source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override addressing mode.
    pub mode: Option<RenderMode>,
    /// Override project.
    pub project: Option<Project>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vh.toml";

const DEFAULT_SOURCE_DIR: &str = "doc";
const DEFAULT_OUTPUT_DIR: &str = "html";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory configuration (paths are relative strings from TOML).
    #[serde(default)]
    docs: DocsConfigRaw,
    /// Site generation configuration.
    pub site: SiteConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved directory configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory holding `*.txt` help files and the optional `tags` table.
    pub source_dir: PathBuf,
    /// Directory receiving rendered pages.
    pub output_dir: PathBuf,
}

/// Site generation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// How pages address each other.
    pub mode: RenderMode,
    /// Documentation set being rendered.
    pub project: Project,
    /// Version label shown in page footers.
    pub version: Option<String>,
    /// Scan documents for `*tag*` definitions in addition to the `tags` table.
    pub scan_tags: bool,
    /// Write `sitemap.xml` and `tags.json`.
    pub sitemap: bool,
    /// Absolute prefix for sitemap URLs. Defaults to the project's site.
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            project: Project::default(),
            version: None,
            scan_tags: true,
            sitemap: true,
            base_url: None,
        }
    }
}

impl SiteConfig {
    /// Configured base URL, or the project's public help site.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/", self.project.vimdoc_site()))
    }

    /// Options handed to the converter.
    #[must_use]
    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            mode: self.mode,
            project: self.project,
            version: self.version.clone(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base_url`").
        field: String,
        /// Error message (e.g., "${`VH_BASE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `vh.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(mode) = settings.mode {
            self.site.mode = mode;
        }
        if let Some(project) = settings.project {
            self.site.project = project;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            site: SiteConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref base_url) = self.site.base_url {
            require_non_empty(base_url, "site.base_url")?;
            require_http_url(base_url, "site.base_url")?;
        }
        if let Some(ref version) = self.site.version {
            require_non_empty(version, "site.version")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand_field(&mut self.docs.source_dir, "docs.source_dir")?;
        expand_field(&mut self.docs.output_dir, "docs.output_dir")?;
        expand_field(&mut self.site.version, "site.version")?;
        expand_field(&mut self.site.base_url, "site.base_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        if let Some(ref source_dir) = self.docs.source_dir {
            require_non_empty(source_dir, "docs.source_dir")?;
        }
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            output_dir: resolve(self.docs.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
        };

        Ok(())
    }
}

fn expand_field(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(raw) = value.as_deref() {
        *value = Some(expand::expand_env(raw, field)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/doc"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/html"));
        assert_eq!(config.site.mode, RenderMode::Online);
        assert_eq!(config.site.project, Project::Vim);
        assert!(config.site.scan_tags);
        assert!(config.site.sitemap);
        assert_eq!(config.site.base_url(), "https://vimhelp.org/");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.mode, RenderMode::Online);
        assert!(config.site.version.is_none());
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
mode = "offline"
project = "neovim"
version = "0.10.0"
scan_tags = false
sitemap = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.mode, RenderMode::Offline);
        assert_eq!(config.site.project, Project::Neovim);
        assert_eq!(config.site.version.as_deref(), Some("0.10.0"));
        assert!(!config.site.scan_tags);
        assert!(!config.site.sitemap);
        assert_eq!(config.site.base_url(), "https://neo.vimhelp.org/");
    }

    #[test]
    fn test_parse_unknown_mode_fails() {
        let toml = r#"
[site]
mode = "sideways"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_converter_options() {
        let toml = r#"
[site]
mode = "offline"
version = "9.1"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let options = config.site.converter_options();
        assert_eq!(options.mode, RenderMode::Offline);
        assert_eq!(options.project, Project::Vim);
        assert_eq!(options.version.as_deref(), Some("9.1"));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "runtime/doc"
output_dir = "public"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project")).unwrap();

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/runtime/doc")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/public")
        );
    }

    #[test]
    fn test_empty_source_dir_rejected() {
        let toml = r#"
[docs]
source_dir = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve_paths(Path::new("/project")).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("docs.source_dir"));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let toml = r#"
[site]
base_url = "vimhelp.org"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/srv/www")),
            mode: Some(RenderMode::Offline),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/doc")); // Unchanged
        assert_eq!(config.site.mode, RenderMode::Offline);
        assert_eq!(config.site.project, Project::Vim); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/vh.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[docs]
source_dir = "src-doc"

[site]
base_url = "https://help.example.org/"
"#,
        )
        .unwrap();

        let settings = CliSettings {
            project: Some(Project::Neovim),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("src-doc"));
        assert_eq!(config.docs_resolved.output_dir, dir.path().join("html"));
        assert_eq!(config.site.project, Project::Neovim);
        assert_eq!(config.site.base_url(), "https://help.example.org/");
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_from_file_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site\nmode = ").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_expands_base_url_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[site]
base_url = "${VH_TEST_SURELY_UNSET_URL:-https://mirror.example.org/}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.site.base_url(), "https://mirror.example.org/");
    }

    #[test]
    fn test_load_expands_paths_and_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[docs]
source_dir = "${VH_TEST_SURELY_UNSET_ROOT:-runtime}/doc"
output_dir = "${VH_TEST_SURELY_UNSET_OUT:-public}"

[site]
version = "${VH_TEST_SURELY_UNSET_VERSION:-9.1}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.docs_resolved.source_dir,
            dir.path().join("runtime/doc")
        );
        assert_eq!(config.docs_resolved.output_dir, dir.path().join("public"));
        assert_eq!(config.site.version.as_deref(), Some("9.1"));
    }

    #[test]
    fn test_load_unset_source_dir_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[docs]
source_dir = "${VH_TEST_SURELY_UNSET_ROOT}/doc"
"#,
        )
        .unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(
            matches!(err, ConfigError::EnvVar { ref field, .. } if field == "docs.source_dir"),
            "Expected ConfigError::EnvVar, got {err:?}"
        );
    }
}
