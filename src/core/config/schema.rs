//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the default group name must be
//! a valid group name and the log level must be a known level.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::GroupName;

/// Log levels accepted in `log_level`.
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// User configuration.
///
/// # Example
///
/// ```toml
/// default_group_name = "Shapes"
/// document = "~/rigs/face/groups.json"
/// log_level = "info"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Name given to groups created without `--name`
    pub default_group_name: Option<String>,

    /// Document used when `--file` is not given
    pub document: Option<PathBuf>,

    /// Log level when neither `--debug`/`--quiet` nor `RUST_LOG` is set
    pub log_level: Option<String>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.default_group_name {
            GroupName::new(name.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("default_group_name: {}", e))
            })?;
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid log_level '{}', must be one of: {}",
                    level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        Ok(())
    }
}
