//! Weather-dependent phase timing.

use super::LightState;
use crate::timing::TimingPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Road conditions. Rain and fog lengthen the red and green phases; yellow,
/// the pedestrian crossing and the emergency flash keep their configured
/// durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Normal,
    Rain,
    Fog,
}

impl Weather {
    /// Time added to the red and green phases.
    pub fn extension(&self) -> Duration {
        match self {
            Self::Normal => Duration::ZERO,
            Self::Rain => Duration::from_millis(1000),
            Self::Fog => Duration::from_millis(2000),
        }
    }
}

impl TimingPolicy<LightState> for Weather {
    fn delay(&self, state: &LightState, base: Duration) -> Duration {
        match state {
            LightState::Red | LightState::Green => base + self.extension(),
            _ => base,
        }
    }
}
