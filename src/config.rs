//! Manager configuration.
//!
//! Defaults are usable as-is; a TOML file can override any field:
//!
//! ```toml
//! device_dir = "/dev/input"
//! capacity_per_role = 10
//! drain_cap = 256
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Directory scanned for event-device nodes.
    #[serde(default = "default_device_dir")]
    pub device_dir: PathBuf,

    /// Bounded registry size per role.
    #[serde(default = "default_capacity")]
    pub capacity_per_role: usize,

    /// Maximum records drained from one device in one cycle.
    #[serde(default = "default_drain_cap")]
    pub drain_cap: usize,
}

fn default_device_dir() -> PathBuf {
    PathBuf::from("/dev/input")
}

fn default_capacity() -> usize {
    10
}

fn default_drain_cap() -> usize {
    256
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            device_dir: default_device_dir(),
            capacity_per_role: default_capacity(),
            drain_cap: default_drain_cap(),
        }
    }
}

impl ManagerConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_per_role == 0 {
            return Err(ConfigError::Invalid(
                "capacity_per_role must be at least 1".into(),
            ));
        }
        if self.drain_cap == 0 {
            return Err(ConfigError::Invalid("drain_cap must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ManagerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.capacity_per_role, 10);
        assert_eq!(config.drain_cap, 256);
        assert_eq!(config.device_dir, PathBuf::from("/dev/input"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: ManagerConfig = toml::from_str("capacity_per_role = 4").unwrap();
        assert_eq!(config.capacity_per_role, 4);
        assert_eq!(config.drain_cap, 256);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config: ManagerConfig = toml::from_str("capacity_per_role = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
