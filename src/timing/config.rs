//! Phase duration configuration for the traffic light.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single problem found while validating a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("Duration of phase '{phase}' must be greater than zero")]
    ZeroDuration { phase: &'static str },
}

/// Errors that can occur when loading a timing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse timing configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid timing configuration: {0:?}")]
    Invalid(Vec<ConfigViolation>),
}

/// Base durations of every timed phase, in milliseconds.
///
/// Missing fields take their default values, so `{}` is the authoritative
/// timing: red 3000, yellow 1000, green 3000, pedestrian crossing 8000 and
/// emergency flash half-period 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub red_ms: u64,
    pub yellow_ms: u64,
    pub green_ms: u64,
    pub pedestrian_ms: u64,
    pub flash_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            red_ms: 3000,
            yellow_ms: 1000,
            green_ms: 3000,
            pedestrian_ms: 8000,
            flash_ms: 500,
        }
    }
}

impl TimingConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every duration, reporting all zero phases at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let phases = [
            ("red", self.red_ms),
            ("yellow", self.yellow_ms),
            ("green", self.green_ms),
            ("pedestrian", self.pedestrian_ms),
            ("flash", self.flash_ms),
        ];

        let checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = phases
            .into_iter()
            .map(|(phase, ms)| {
                if ms == 0 {
                    Validation::fail(ConfigViolation::ZeroDuration { phase })
                } else {
                    Validation::success(())
                }
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => {
                Err(ConfigError::Invalid(violations.iter().cloned().collect()))
            }
        }
    }

    pub fn red(&self) -> Duration {
        Duration::from_millis(self.red_ms)
    }

    pub fn yellow(&self) -> Duration {
        Duration::from_millis(self.yellow_ms)
    }

    pub fn green(&self) -> Duration {
        Duration::from_millis(self.green_ms)
    }

    pub fn pedestrian(&self) -> Duration {
        Duration::from_millis(self.pedestrian_ms)
    }

    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }
}
