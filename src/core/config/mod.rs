//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first hit wins:
//! 1. `$BSG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/blendgroups/config.toml`
//! 3. `~/.blendgroups/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use blendgroups::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Document: {}", config.document().display());
//! println!("Default name: {}", config.default_group_name());
//! ```

pub mod schema;

pub use schema::ConfigFile;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::naming::DEFAULT_GROUP_NAME;

/// Document used when neither `--file` nor config names one.
pub const DEFAULT_DOCUMENT: &str = "groups.json";

/// Log level used when nothing else sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents (all fields optional)
    pub file: ConfigFile,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. A missing config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// First existing config file among the standard locations.
    fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("BSG_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("blendgroups/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".blendgroups/config.toml"))
            .filter(|path| path.exists())
    }

    /// Path the config was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name for groups created without an explicit one.
    pub fn default_group_name(&self) -> &str {
        self.file
            .default_group_name
            .as_deref()
            .unwrap_or(DEFAULT_GROUP_NAME)
    }

    /// Document to operate on when `--file` is absent.
    pub fn document(&self) -> PathBuf {
        self.file
            .document
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT))
    }

    /// Configured log level.
    pub fn log_level(&self) -> &str {
        self.file.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.default_group_name(), DEFAULT_GROUP_NAME);
        assert_eq!(config.document(), PathBuf::from(DEFAULT_DOCUMENT));
        assert_eq!(config.log_level(), DEFAULT_LOG_LEVEL);
        assert!(config.path().is_none());
    }

    #[test]
    fn load_from_applies_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_group_name = \"Shapes\"\nlog_level = \"info\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.default_group_name(), "Shapes");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.path(), Some(path.as_path()));
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_group_name = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn load_from_validates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "log_level = \"chatty\"\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn load_from_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            Config::load_from(&temp.path().join("nope.toml")),
            Err(ConfigError::ReadError { .. })
        ));
    }
}
