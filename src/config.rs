//! Configuration management for the RAM file store
//!
//! Limits are read once when the store is built: built-in defaults, then an
//! optional TOML file, then `RAMFS_*` environment variables.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Config file looked up (without extension) when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "ramfs";

/// Prefix for environment overrides, e.g. `RAMFS_MAX_ENTRIES=32`
pub const ENV_PREFIX: &str = "RAMFS";

/// Store limits and defaults
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of slots in the table, live or not
    pub max_entries: usize,

    /// Paths must be strictly shorter than this (bytes)
    pub max_path_len: usize,

    /// File contents must be strictly shorter than this (bytes)
    pub max_content_len: usize,

    /// Character splitting a path into segments
    pub separator: char,

    /// Permissions given to directories synthesized for missing ancestors
    pub default_dir_permissions: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: 10,
            max_path_len: 256,
            max_content_len: 1024,
            separator: '/',
            default_dir_permissions: 0,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file with environment overrides.
    ///
    /// Without an explicit path, `ramfs.toml` in the working directory is used
    /// when present and skipped otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: StoreConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from inline TOML, defaults filling the gaps
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::Message(
                "max_entries must be greater than 0".into(),
            ));
        }

        if self.max_path_len < 2 {
            return Err(ConfigError::Message(
                "max_path_len must be at least 2".into(),
            ));
        }

        if self.max_content_len == 0 {
            return Err(ConfigError::Message(
                "max_content_len must be greater than 0".into(),
            ));
        }

        if self.separator.is_alphanumeric() || self.separator.is_whitespace() {
            return Err(ConfigError::Message(format!(
                "separator {:?} cannot be alphanumeric or whitespace",
                self.separator
            )));
        }

        Ok(())
    }
}
