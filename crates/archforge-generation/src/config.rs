//! Generator configuration
//!
//! Values come from an optional TOML file overlaid with `ARCHFORGE_*`
//! environment variables, e.g. `ARCHFORGE_LIBS_DIR=packages` or
//! `ARCHFORGE_TEMPLATE_DIRS=templates,vendor/templates`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{context::OverridePolicy, error::ConfigError};

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "archforge.toml";

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "ARCHFORGE";

/// Settings that shape every generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory holding generated libraries, relative to the workspace
    pub libs_dir: String,
    /// Package scope used when a request gives none
    pub default_scope: String,
    /// How caller overrides treat built-in context keys
    pub override_policy: OverridePolicy,
    /// Directories of user YAML templates, loaded in order
    pub template_dirs: Vec<PathBuf>,
    /// Expose Prometheus metrics instead of discarding them
    pub metrics: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            libs_dir: "libs".to_string(),
            default_scope: "@app".to_string(),
            override_policy: OverridePolicy::Replace,
            template_dirs: Vec::new(),
            metrics: false,
        }
    }
}

impl GeneratorConfig {
    /// Reject values generation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.libs_dir.trim().is_empty() {
            return Err(ConfigError::Validation("libs_dir cannot be empty".to_string()));
        }
        validate_scope(&self.default_scope)?;
        Ok(())
    }
}

/// Check that `scope` is an npm scope such as `@shop`
pub fn validate_scope(scope: &str) -> Result<(), ConfigError> {
    if !scope.starts_with('@') || scope.len() < 2 {
        return Err(ConfigError::Validation(format!(
            "scope '{}' must start with '@' and name a scope",
            scope
        )));
    }
    Ok(())
}

/// Loads a [`GeneratorConfig`] from file and environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: PathBuf,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading `archforge.toml` from the working directory
    pub fn new() -> Self {
        Self::with_path(PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Loader reading a specific file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Use another environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// File this loader reads
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(&self) -> Result<GeneratorConfig, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("template_dirs"),
            );

        let config: GeneratorConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            path = %self.config_path.display(),
            libs_dir = %config.libs_dir,
            "Loaded generator configuration"
        );
        Ok(config)
    }
}
