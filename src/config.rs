//! Simulation configuration
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SIM_DT;
use crate::sim::robot::RobotParams;
use crate::sim::shuttle::ShuttleParams;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep (s)
    pub dt: f32,
    /// Seed of the live shot planner
    pub seed: u64,
    /// Server of the first rally (1 or 2)
    pub first_server: u8,
    /// Height of the serve toss above the strike height (cm)
    pub serve_toss_height: f32,
    /// Pause between a point and the next serve (s)
    pub rally_reset_delay: f32,
    pub shuttle: ShuttleParams,
    pub robot: RobotParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            seed: 12345,
            first_server: 1,
            serve_toss_height: 40.0,
            rally_reset_delay: 1.0,
            shuttle: ShuttleParams::default(),
            robot: RobotParams::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Load from `path`, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return invalid("dt", "must be positive");
        }
        if !matches!(self.first_server, 1 | 2) {
            return invalid("first_server", "must be 1 or 2");
        }
        if self.serve_toss_height < 0.0 {
            return invalid("serve_toss_height", "must not be negative");
        }
        if self.rally_reset_delay < 0.0 {
            return invalid("rally_reset_delay", "must not be negative");
        }
        if self.shuttle.cork_mass <= 0.0 || self.shuttle.skirt_mass <= 0.0 {
            return invalid("shuttle", "masses must be positive");
        }
        if !(0.0..=1.0).contains(&self.shuttle.ground_attenuation) {
            return invalid("shuttle.ground_attenuation", "must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.robot.racket_attenuation) {
            return invalid("robot.racket_attenuation", "must be within 0..=1");
        }
        if self.robot.body_speed <= 0.0 || self.robot.angular_speed <= 0.0 {
            return invalid("robot", "speeds must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "seed": 7, "robot": { "body_speed": 300.0 } }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.robot.body_speed, 300.0);
        assert_eq!(config.robot.arm_length, RobotParams::default().arm_length);
        assert_eq!(config.dt, SIM_DT);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = SimConfig::from_json(r#"{ "first_server": 3 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "first_server", .. }));
        let err = SimConfig::from_json(r#"{ "dt": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "dt", .. }));
        assert!(matches!(SimConfig::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = "/nonexistent/shuttle-rally.json";
        let config = SimConfig::load(path);
        assert_eq!(config.seed, SimConfig::default().seed);
        assert!(matches!(SimConfig::read(path), Err(ConfigError::Io(_))));
    }
}
