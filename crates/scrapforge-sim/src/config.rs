//! Simulation configuration.
//!
//! Describes one scripted run: clock, owner reserve, launcher tuning and the
//! button spans to replay. Configuration is loaded from a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use scrapforge_gameplay::{Buttons, ConfigError, LauncherConfig};

use crate::timing::DEFAULT_TICK_RATE;

/// Configuration file name.
pub const CONFIG_FILE: &str = "scrapforge.toml";

/// Errors from loading a simulation config.
#[derive(Debug, Error)]
pub enum SimConfigError {
    /// Failed to read file.
    #[error("Failed to read sim config: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse sim config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Launcher section is invalid.
    #[error("Launcher config: {0}")]
    Launcher(#[from] ConfigError),

    /// A value is out of range.
    #[error("Invalid sim config: {0}")]
    Invalid(String),
}

/// Button driven by an input span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Primary attack.
    Attack,
    /// Secondary attack.
    Attack2,
}

/// A button held from `from` (inclusive) to `to` (exclusive), in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSpan {
    /// Button held.
    pub button: ButtonKind,
    /// Press time.
    pub from: f32,
    /// Release time.
    pub to: f32,
}

impl InputSpan {
    /// Create a span.
    #[must_use]
    pub const fn new(button: ButtonKind, from: f32, to: f32) -> Self {
        Self { button, from, to }
    }

    /// Check if the button is held at `time`.
    #[must_use]
    pub fn covers(&self, time: f32) -> bool {
        self.from <= time && time < self.to
    }
}

/// One scripted simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks per second.
    pub tick_rate: u32,
    /// Time of the first tick, in seconds. Must be positive.
    pub start_time: f32,
    /// Length of the run, in seconds.
    pub duration: f32,
    /// Metal the owner starts with.
    pub reserve_metal: i32,
    /// Whether this side renders (emits charge-loop sounds).
    pub renders: bool,
    /// Answer of the attack gate for the whole run.
    pub can_attack: bool,
    /// Launcher tuning.
    pub launcher: LauncherConfig,
    /// Scripted button spans.
    pub inputs: Vec<InputSpan>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            start_time: 1.0,
            duration: 14.0,
            reserve_metal: 200,
            renders: true,
            can_attack: true,
            launcher: LauncherConfig::default(),
            inputs: vec![
                // Partial charge, released
                InputSpan::new(ButtonKind::Attack, 1.0, 3.0),
                // Charge cancelled, then held through the cooldown
                InputSpan::new(ButtonKind::Attack, 4.0, 5.5),
                InputSpan::new(ButtonKind::Attack2, 4.8, 4.9),
                // Held past full charge, then recharged and released
                InputSpan::new(ButtonKind::Attack, 7.0, 13.0),
            ],
        }
    }
}

impl SimConfig {
    /// Load configuration from a path.
    /// Returns the default config if the file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SimConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, SimConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the run is well formed.
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.tick_rate == 0 {
            return Err(SimConfigError::Invalid("tick_rate must be at least 1".into()));
        }
        if !(self.start_time.is_finite() && self.start_time > 0.0) {
            return Err(SimConfigError::Invalid(format!(
                "start_time must be positive, got {}",
                self.start_time
            )));
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(SimConfigError::Invalid(format!(
                "duration must not be negative, got {}",
                self.duration
            )));
        }
        if let Some(span) = self.inputs.iter().find(|s| s.to < s.from) {
            return Err(SimConfigError::Invalid(format!(
                "input span {span:?} ends before it starts"
            )));
        }
        self.launcher.validate()?;
        Ok(())
    }

    /// Buttons held at `time`.
    #[must_use]
    pub fn buttons_at(&self, time: f32) -> Buttons {
        let held = |kind| {
            self.inputs
                .iter()
                .any(|span| span.button == kind && span.covers(time))
        };
        Buttons {
            attack: held(ButtonKind::Attack),
            attack2: held(ButtonKind::Attack2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_rate, 66);
    }

    #[test]
    fn test_buttons_at() {
        let config = SimConfig::default();

        assert_eq!(config.buttons_at(0.5), Buttons::NONE);
        assert_eq!(config.buttons_at(1.0), Buttons::ATTACK);
        assert_eq!(config.buttons_at(3.0), Buttons::NONE);
        assert_eq!(
            config.buttons_at(4.85),
            Buttons {
                attack: true,
                attack2: true
            }
        );
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            tick_rate = 100
            reserve_metal = 75

            [launcher]
            max_charge_time = 2.0

            [[inputs]]
            button = "attack"
            from = 1.0
            to = 2.0
        "#;

        let config = SimConfig::from_toml_str(toml).expect("valid config");
        assert_eq!(config.tick_rate, 100);
        assert_eq!(config.reserve_metal, 75);
        assert_eq!(config.launcher.max_charge_time, 2.0);
        assert_eq!(config.launcher.max_cost, 75);
        assert_eq!(config.inputs, vec![InputSpan::new(ButtonKind::Attack, 1.0, 2.0)]);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            SimConfig::from_toml_str("tick_rate = 0"),
            Err(SimConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("start_time = 0.0"),
            Err(SimConfigError::Invalid(_))
        ));
        assert!(matches!(
            SimConfig::from_toml_str("[launcher]\nmin_cost = 90"),
            Err(SimConfigError::Launcher(_))
        ));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = SimConfig::load_from("/nonexistent/path/scrapforge.toml").expect("defaults");
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, "duration = 3.0\nrenders = false\n").expect("Failed to write config");

        let config = SimConfig::load_from(&path).expect("Failed to load config");
        assert_eq!(config.duration, 3.0);
        assert!(!config.renders);
        assert_eq!(config.inputs, SimConfig::default().inputs);
    }
}
