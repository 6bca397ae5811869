//! Configuration management for refdoc.
//!
//! Parses `refdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.title`
//! - `links.external_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override artifact list.
    pub artifacts: Option<Vec<PathBuf>>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override site title.
    pub title: Option<String>,
    /// Override parallel page writes.
    pub parallel_writes: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "refdoc.toml";

/// Default external reference URL template.
pub const DEFAULT_EXTERNAL_URL: &str = "https://learn.microsoft.com/en-us/dotnet/api/{name}";

/// Placeholder replaced by the referenced type name in `links.external_url`.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site configuration.
    pub site: SiteConfig,
    /// Input configuration (paths are relative strings from TOML).
    input: InputConfigRaw,
    /// External link configuration.
    pub links: LinksConfig,
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the header and page titles.
    pub title: String,
    /// Output directory, relative to the config file.
    output_dir: Option<String>,
    /// Extension of generated page files (without the dot).
    pub file_extension: String,
    /// Write pages in parallel.
    pub parallel_writes: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "API Reference".to_owned(),
            output_dir: None,
            file_extension: "html".to_owned(),
            parallel_writes: true,
        }
    }
}

/// Raw input configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct InputConfigRaw {
    artifacts: Vec<String>,
}

/// Resolved input and output paths.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Artifact descriptions to document.
    pub artifacts: Vec<PathBuf>,
    /// Directory receiving the generated site.
    pub output_dir: PathBuf,
}

/// External link configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Namespaces whose types link to the external reference.
    pub well_known_namespaces: Vec<String>,
    /// External reference URL template containing `{name}`.
    pub external_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            well_known_namespaces: vec!["System".to_owned()],
            external_url: DEFAULT_EXTERNAL_URL.to_owned(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Attribute types never shown in syntax blocks.
    pub hidden_attributes: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hidden_attributes: vec![
                "System.Runtime.CompilerServices.ExtensionAttribute".to_owned(),
                "System.Runtime.CompilerServices.CompilerGeneratedAttribute".to_owned(),
            ],
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
        /// Config field path (e.g., "`site.title`").
        field: String,
        /// Error message (e.g., "${`DOCS_VERSION`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
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
    /// Otherwise, searches for `refdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The merged
    /// configuration is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
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

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(artifacts) = &settings.artifacts
            && !artifacts.is_empty()
        {
            self.paths.artifacts.clone_from(artifacts);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.paths.output_dir.clone_from(output_dir);
        }
        if let Some(title) = &settings.title {
            self.site.title.clone_from(title);
        }
        if let Some(parallel_writes) = settings.parallel_writes {
            self.site.parallel_writes = parallel_writes;
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
            site: SiteConfig::default(),
            input: InputConfigRaw::default(),
            links: LinksConfig::default(),
            render: RenderConfig::default(),
            paths: PathsConfig {
                artifacts: Vec::new(),
                output_dir: base.join("site"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_links()?;
        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.file_extension, "site.file_extension")?;

        if self
            .site
            .file_extension
            .contains(['.', '/', '\\'])
        {
            return Err(ConfigError::Validation(
                "site.file_extension must not contain dots or path separators".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate external link configuration.
    fn validate_links(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.links.external_url, "links.external_url")?;
        require_http_url(&self.links.external_url, "links.external_url")?;

        if !self.links.external_url.contains(NAME_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "links.external_url must contain the {NAME_PLACEHOLDER} placeholder"
            )));
        }

        if self.links.well_known_namespaces.iter().any(|ns| ns.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "links.well_known_namespaces cannot contain empty names".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.title = expand::expand_env(&self.site.title, "site.title")?;
        self.links.external_url = expand::expand_env(&self.links.external_url, "links.external_url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.paths = PathsConfig {
            artifacts: self
                .input
                .artifacts
                .iter()
                .map(|artifact| config_dir.join(artifact))
                .collect(),
            output_dir: config_dir.join(self.site.output_dir.as_deref().unwrap_or("site")),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.title, "API Reference");
        assert_eq!(config.site.file_extension, "html");
        assert!(config.site.parallel_writes);
        assert_eq!(config.paths.output_dir, PathBuf::from("/test/site"));
        assert!(config.paths.artifacts.is_empty());
        assert_eq!(config.links.well_known_namespaces, vec!["System".to_owned()]);
        assert_eq!(config.links.external_url, DEFAULT_EXTERNAL_URL);
        assert_eq!(config.render.hidden_attributes.len(), 2);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "API Reference");
        assert_eq!(config.links.external_url, DEFAULT_EXTERNAL_URL);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[site]
title = "Shapes"
output_dir = "public"
file_extension = "htm"
parallel_writes = false

[input]
artifacts = ["build/Shapes.json"]

[links]
well_known_namespaces = ["System", "Microsoft"]
external_url = "https://docs.example.com/{name}"

[render]
hidden_attributes = []
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.site.title, "Shapes");
        assert_eq!(config.site.file_extension, "htm");
        assert!(!config.site.parallel_writes);
        assert_eq!(
            config.links.well_known_namespaces,
            vec!["System".to_owned(), "Microsoft".to_owned()]
        );
        assert_eq!(config.links.external_url, "https://docs.example.com/{name}");
        assert!(config.render.hidden_attributes.is_empty());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[site]
output_dir = "public"

[input]
artifacts = ["build/Shapes.json", "../other/Printing.json"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.paths.output_dir, PathBuf::from("/project/public"));
        assert_eq!(
            config.paths.artifacts,
            vec![
                PathBuf::from("/project/build/Shapes.json"),
                PathBuf::from("/project/../other/Printing.json"),
            ]
        );
    }

    #[test]
    fn test_resolve_paths_default_output() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/project/site"));
    }

    #[test]
    fn test_apply_cli_settings_output_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/custom/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.paths.output_dir, PathBuf::from("/custom/out"));
        assert_eq!(config.site.title, "API Reference"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_artifacts() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.paths.artifacts = vec![PathBuf::from("/test/from-config.json")];
        let overrides = CliSettings {
            artifacts: Some(vec![PathBuf::from("Shapes.json")]),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.paths.artifacts, vec![PathBuf::from("Shapes.json")]);
    }

    #[test]
    fn test_apply_cli_settings_empty_artifacts_keep_config() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.paths.artifacts = vec![PathBuf::from("/test/from-config.json")];
        let overrides = CliSettings {
            artifacts: Some(Vec::new()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.paths.artifacts, vec![PathBuf::from("/test/from-config.json")]);
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            title: Some("Shapes".to_owned()),
            parallel_writes: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.site.title, "Shapes");
        assert!(!config.site.parallel_writes);
        assert_eq!(config.paths.output_dir, PathBuf::from("/test/site"));
    }

    #[test]
    fn test_expand_env_vars_title() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("REFDOC_CONFIG_TEST_VERSION", "2.1");
        }
        let toml = r#"
[site]
title = "Shapes ${REFDOC_CONFIG_TEST_VERSION}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.site.title, "Shapes 2.1");
        unsafe {
            std::env::remove_var("REFDOC_CONFIG_TEST_VERSION");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("REFDOC_CONFIG_TEST_MISSING");
        }
        let toml = r#"
[links]
external_url = "https://${REFDOC_CONFIG_TEST_MISSING}/{name}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("links.external_url"));
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_title_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.title"));
    }

    #[test]
    fn test_validate_file_extension_with_dot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.file_extension = ".html".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("site.file_extension"));
    }

    #[test]
    fn test_validate_external_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.external_url = "ftp://example.com/{name}".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_validate_external_url_placeholder() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.external_url = "https://example.com/api".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{name}"));
    }

    #[test]
    fn test_validate_empty_namespace() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.links.well_known_namespaces.push(String::new());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/refdoc.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("refdoc.toml");
        std::fs::write(
            &path,
            r#"
[site]
title = "Shapes"

[input]
artifacts = ["Shapes.json"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.title, "Shapes");
        assert_eq!(config.paths.artifacts, vec![temp_dir.path().join("Shapes.json")]);
        assert_eq!(config.paths.output_dir, temp_dir.path().join("site"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_validates_cli_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("refdoc.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            title: Some(String::new()),
            ..Default::default()
        };

        let result = Config::load(Some(&path), Some(&overrides));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
