//! Configuration file loading and parsing.

use crate::types::XrcgConfig;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Directory under the project root holding the config file.
pub const CONFIG_DIR: &str = ".xrcg";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern is valid")
    })
}

/// Configuration loader.
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Project root this loader resolves against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the project config file.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.xrcg/config.yaml`, falling back to defaults
    /// when the file does not exist.
    pub fn load(&self) -> Result<XrcgConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(XrcgConfig::default());
        }

        self.load_from(&config_path)
    }

    /// Load configuration from an explicit file. A missing file is an error.
    pub fn load_from(&self, path: &Path) -> Result<XrcgConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        self.parse(&contents)
    }

    /// Parse configuration text: env expansion, YAML, validation.
    pub fn parse(&self, contents: &str) -> Result<XrcgConfig, ConfigError> {
        let expanded = self.expand_env_vars(contents)?;

        // An empty or comment-only file means "all defaults".
        if expanded.trim().is_empty() {
            return Ok(XrcgConfig::default());
        }

        let config: XrcgConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        self.validate(&config)?;
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();

        for cap in env_pattern().captures_iter(content) {
            let full_match = &cap[0];
            let var_name = &cap[1];
            let default = cap.get(2).map(|m| m.as_str());

            let value = match std::env::var(var_name) {
                Ok(v) => v,
                Err(_) => match default {
                    Some(d) => d.to_string(),
                    None => {
                        return Err(ConfigError::EnvVarNotFound {
                            var: var_name.to_string(),
                        })
                    }
                },
            };

            result = result.replace(full_match, &value);
        }

        Ok(result)
    }

    /// Validate configuration values.
    pub fn validate(&self, config: &XrcgConfig) -> Result<(), ConfigError> {
        let registry = &config.registry;
        if registry.command_prefix.trim().is_empty() {
            return Err(ConfigError::invalid("registry.command_prefix must not be empty"));
        }
        if registry.separator.is_empty() {
            return Err(ConfigError::invalid("registry.separator must not be empty"));
        }
        if registry.metadata_file.trim().is_empty() {
            return Err(ConfigError::invalid("registry.metadata_file must not be empty"));
        }
        if registry.extensions.is_empty() {
            return Err(ConfigError::invalid("registry.extensions must list at least one suffix"));
        }
        if let Some(ext) = registry.extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(ConfigError::invalid(format!(
                "registry.extensions entry '{ext}' must start with '.'"
            )));
        }
        if !registry.output_pattern.contains("{input_file_name}") {
            return Err(ConfigError::invalid(
                "registry.output_pattern must contain {input_file_name}",
            ));
        }

        let manifest = &config.manifest;
        if manifest.namespace.trim().is_empty() {
            return Err(ConfigError::invalid("manifest.namespace must not be empty"));
        }
        if manifest.umbrella.id.trim().is_empty() {
            return Err(ConfigError::invalid("manifest.umbrella.id must not be empty"));
        }

        let mut keys = HashSet::new();
        let mut ids = HashSet::new();
        for group in &manifest.groups {
            if !keys.insert(group.key.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "manifest.groups has duplicate key '{}'",
                    group.key
                )));
            }
            if !ids.insert(group.id.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "manifest.groups has duplicate submenu id '{}'",
                    group.id
                )));
            }
        }
        if ids.contains(manifest.context_menu.as_str()) {
            return Err(ConfigError::invalid(format!(
                "submenu id '{}' collides with manifest.context_menu",
                manifest.context_menu
            )));
        }
        if ids.contains(manifest.umbrella.id.as_str()) {
            return Err(ConfigError::invalid(format!(
                "submenu id '{}' is used by both the umbrella and a group",
                manifest.umbrella.id
            )));
        }

        if config.tool.name.trim().is_empty() {
            return Err(ConfigError::invalid("tool.name must not be empty"));
        }
        if semver::Version::parse(&config.tool.min_version).is_err() {
            return Err(ConfigError::invalid(format!(
                "tool.min_version '{}' is not a MAJOR.MINOR.PATCH version",
                config.tool.min_version
            )));
        }
        if config.tool.install_command.is_empty() {
            return Err(ConfigError::invalid("tool.install_command must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetadataPolicy;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, contents: &str) {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(CONFIG_FILE), contents).unwrap();
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        let config = loader.load().unwrap();
        assert_eq!(config.registry.command_prefix, "generate");
        assert_eq!(config.manifest.namespace, "xrcg");
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());
        let err = loader.load_from(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
registry:
  default_priority: 500
  metadata_policy: lenient
manifest:
  category: Custom
tool:
  min_version: 1.2.3
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.registry.default_priority, 500);
        assert_eq!(config.registry.metadata_policy, MetadataPolicy::Lenient);
        assert_eq!(config.manifest.category, "Custom");
        assert_eq!(config.tool.min_version, "1.2.3");

        // Unspecified values keep their defaults
        assert_eq!(config.registry.separator, "-");
        assert_eq!(config.manifest.groups.len(), 7);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempdir().unwrap();
        write_config(dir.path(), "# nothing here\n");
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.tool.name, "xrcg");
    }

    #[test]
    fn test_parse_error_reports_line() {
        let loader = ConfigLoader::new(".");
        let err = loader.parse("registry:\n  default_priority: [unclosed\n").unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("XRCG_TEST_CATEGORY", "FromEnv");
        let loader = ConfigLoader::new(".");
        let result = loader.expand_env_vars("key: ${XRCG_TEST_CATEGORY}").unwrap();
        assert_eq!(result, "key: FromEnv");
        std::env::remove_var("XRCG_TEST_CATEGORY");
    }

    #[test]
    fn test_env_var_default() {
        let loader = ConfigLoader::new(".");
        let result = loader
            .expand_env_vars("key: ${XRCG_TEST_NONEXISTENT:-default}")
            .unwrap();
        assert_eq!(result, "key: default");
    }

    #[test]
    fn test_env_var_missing_error() {
        let loader = ConfigLoader::new(".");
        match loader.expand_env_vars("key: ${XRCG_TEST_MISSING_VAR}").unwrap_err() {
            ConfigError::EnvVarNotFound { var } => assert_eq!(var, "XRCG_TEST_MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_var_expansion_in_config() {
        std::env::set_var("XRCG_TEST_NAMESPACE", "acme");
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
manifest:
  namespace: ${XRCG_TEST_NAMESPACE}
  fallback_version: ${XRCG_TEST_FALLBACK:-2.0.0}
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.manifest.namespace, "acme");
        assert_eq!(config.manifest.fallback_version, "2.0.0");
        std::env::remove_var("XRCG_TEST_NAMESPACE");
    }

    #[test]
    fn test_validation_rejects_empty_prefix() {
        let loader = ConfigLoader::new(".");
        let err = loader.parse("registry:\n  command_prefix: ''\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_min_version() {
        let loader = ConfigLoader::new(".");
        let err = loader.parse("tool:\n  min_version: latest\n").unwrap_err();
        assert!(err.to_string().contains("min_version"));
    }

    #[test]
    fn test_validation_rejects_duplicate_submenu_ids() {
        let loader = ConfigLoader::new(".");
        let yaml = r#"
manifest:
  groups:
    - { key: python, label: Python, id: xrcg.py }
    - { key: snake, label: Snake, id: xrcg.py }
"#;
        let err = loader.parse(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate submenu id"));
    }

    #[test]
    fn test_validation_rejects_umbrella_clash() {
        let loader = ConfigLoader::new(".");
        let yaml = r#"
manifest:
  groups:
    - { key: python, label: Python, id: xrcgSubmenu }
"#;
        assert!(loader.parse(yaml).is_err());
    }

    #[test]
    fn test_validation_rejects_group_named_like_context_menu() {
        let loader = ConfigLoader::new(".");
        let yaml = r#"
manifest:
  groups:
    - { key: python, label: Python, id: explorer/context }
"#;
        let err = loader.parse(yaml).unwrap_err();
        assert!(err.to_string().contains("manifest.context_menu"));
    }

    #[test]
    fn test_validation_rejects_pattern_without_input_placeholder() {
        let loader = ConfigLoader::new(".");
        let err = loader
            .parse("registry:\n  output_pattern: out-{language}\n")
            .unwrap_err();
        assert!(err.to_string().contains("{input_file_name}"));
    }
}
