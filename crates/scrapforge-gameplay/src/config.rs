//! Charged launcher tuning.
//!
//! Values are read from TOML. Every field has a default, so a file only needs
//! to name what it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::weapon::{DEFAULT_FIRE_INTERVAL, DEFAULT_MAX_CHARGE_TIME};

/// Metal spent by an uncharged shot.
pub const MIN_COST: i32 = 30;

/// Metal spent by a fully charged shot.
pub const MAX_COST: i32 = 75;

/// Seconds a cancelled charge blocks the next one.
pub const CANCEL_COOLDOWN: f32 = 1.5;

/// How far past full charge an elapsed time still counts as a valid charge window.
pub const COST_WINDOW_SLACK: f32 = 0.01;

/// Errors from loading or validating launcher config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the file.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize TOML.
    #[error("Failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tuning for the charged scrap launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Cost of an uncharged shot.
    pub min_cost: i32,
    /// Cost of a fully charged shot.
    pub max_cost: i32,
    /// Cooldown after cancelling a charge, in seconds.
    pub cancel_cooldown: f32,
    /// Time to reach full charge, in seconds.
    pub max_charge_time: f32,
    /// Tolerance past full charge before a charge window counts as stale.
    pub cost_window_slack: f32,
    /// Delay between launches, in seconds.
    pub fire_interval: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            min_cost: MIN_COST,
            max_cost: MAX_COST,
            cancel_cooldown: CANCEL_COOLDOWN,
            max_charge_time: DEFAULT_MAX_CHARGE_TIME,
            cost_window_slack: COST_WINDOW_SLACK,
            fire_interval: DEFAULT_FIRE_INTERVAL,
        }
    }
}

impl LauncherConfig {
    /// Parse and validate config from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate config from a file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded launcher config from {}", path.display());
        Ok(config)
    }

    /// Save config to a file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!("Saved launcher config to {}", path.display());
        Ok(())
    }

    /// Check that every value is usable.
    ///
    /// `max_cost == min_cost` is allowed: every shot then costs `min_cost` and
    /// fires on the first charged frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cost < 0 {
            return Err(ConfigError::Invalid(format!(
                "min_cost must not be negative, got {}",
                self.min_cost
            )));
        }
        if self.max_cost < self.min_cost {
            return Err(ConfigError::Invalid(format!(
                "max_cost {} is below min_cost {}",
                self.max_cost, self.min_cost
            )));
        }

        let times = [
            ("cancel_cooldown", self.cancel_cooldown),
            ("max_charge_time", self.max_charge_time),
            ("cost_window_slack", self.cost_window_slack),
            ("fire_interval", self.fire_interval),
        ];
        for (name, value) in times {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative number of seconds, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LauncherConfig::default();
        assert_eq!(config.min_cost, 30);
        assert_eq!(config.max_cost, 75);
        assert_eq!(config.cancel_cooldown, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LauncherConfig::from_toml_str("max_charge_time = 2.0\n").expect("valid");
        assert_eq!(config.max_charge_time, 2.0);
        assert_eq!(config.max_cost, 75);
    }

    #[test]
    fn test_inverted_costs_rejected() {
        let result = LauncherConfig::from_toml_str("min_cost = 80\nmax_cost = 75\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_equal_costs_allowed() {
        let config =
            LauncherConfig::from_toml_str("min_cost = 50\nmax_cost = 50\n").expect("valid");
        assert_eq!(config.min_cost, config.max_cost);
    }

    #[test]
    fn test_negative_cooldown_rejected() {
        let config = LauncherConfig {
            cancel_cooldown: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml() {
        let result = LauncherConfig::from_toml_str("min_cost = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("launcher.toml");

        let config = LauncherConfig {
            max_charge_time: 3.0,
            cancel_cooldown: 2.0,
            ..Default::default()
        };
        config.save_to(&path).expect("Failed to save config");

        let loaded = LauncherConfig::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = LauncherConfig::load_from("/nonexistent/path/launcher.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
