//! The traffic light: states, events and the authoritative transition table.
//!
//! ```text
//! red ──NEXT/3000ms──▶ green ──NEXT/3000ms──▶ yellow ──NEXT/1000ms──▶ red
//!  │ ▲                   │
//!  │ └───────────────────┴── PEDESTRIAN_REQUEST ──▶ pedestrian_green ──DONE/8000ms──▶ red
//!  │
//!  ├── EMERGENCY ──▶ emergency ◀──500ms──▶ emergency_flash_off ──CLEAR_EMERGENCY──▶ red
//!  └── FAULT ──▶ fault ──RESET_FAULT──▶ red
//! ```
//!
//! `MANUAL_RED`, `MANUAL_YELLOW` and `MANUAL_GREEN` force any cyclic state.
//! `EMERGENCY` and `FAULT` are accepted from the cyclic states and from
//! `pedestrian_green`. Every other pair is ignored.

mod weather;

pub use weather::Weather;

use crate::builder::{BuildError, TableBuilder};
use crate::core::TransitionRecord;
use crate::effects::{Scheduler, TimedMachine, TransitionTable};
use crate::timing::{ConfigError, TimingConfig};
use crate::{event_enum, state_enum};
use serde::{Deserialize, Serialize};
use thiserror::Error;

state_enum! {
    /// Operating mode of the light. Exactly one is active at a time.
    pub enum LightState {
        Red => "red",
        Yellow => "yellow",
        Green => "green",
        PedestrianGreen => "pedestrian_green",
        Emergency => "emergency",
        EmergencyFlashOff => "emergency_flash_off",
        Fault => "fault",
    }
    error: [Fault]
}

event_enum! {
    /// Signals a controller or operator can send to the light.
    pub enum LightEvent {
        Next => "NEXT",
        ManualRed => "MANUAL_RED",
        ManualYellow => "MANUAL_YELLOW",
        ManualGreen => "MANUAL_GREEN",
        PedestrianRequest => "PEDESTRIAN_REQUEST",
        PedestrianDone => "PEDESTRIAN_DONE",
        Emergency => "EMERGENCY",
        ClearEmergency => "CLEAR_EMERGENCY",
        Fault => "FAULT",
        ResetFault => "RESET_FAULT",
    }
}

impl LightState {
    /// The three states of the normal red/green/yellow cycle.
    pub const CYCLIC: [LightState; 3] = [LightState::Red, LightState::Yellow, LightState::Green];

    pub fn is_cyclic(&self) -> bool {
        matches!(self, Self::Red | Self::Yellow | Self::Green)
    }

    /// Either half of the emergency flash.
    pub fn is_emergency(&self) -> bool {
        matches!(self, Self::Emergency | Self::EmergencyFlashOff)
    }
}

/// A traffic light machine.
pub type TrafficLight = TimedMachine<LightState, LightEvent>;

/// Errors that can occur when building a configured traffic light.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// The authoritative table with default timing.
pub fn table() -> TransitionTable<LightState, LightEvent> {
    // Default config always validates and the rules have no duplicates.
    table_with(&TimingConfig::default()).expect("Default traffic light table should always build")
}

/// The authoritative rules with phase durations taken from `config`.
pub fn table_with(
    config: &TimingConfig,
) -> Result<TransitionTable<LightState, LightEvent>, TrafficError> {
    use self::LightEvent as Ev;
    use self::LightState as St;

    config.validate()?;

    let table = TableBuilder::new()
        .initial(St::Red)
        .on(St::Red, Ev::Next, St::Green)
        .on(St::Green, Ev::Next, St::Yellow)
        .on(St::Yellow, Ev::Next, St::Red)
        .on_each(&St::CYCLIC, Ev::ManualRed, St::Red)
        .on_each(&St::CYCLIC, Ev::ManualYellow, St::Yellow)
        .on_each(&St::CYCLIC, Ev::ManualGreen, St::Green)
        .on_each(&[St::Red, St::Green], Ev::PedestrianRequest, St::PedestrianGreen)
        .on(St::PedestrianGreen, Ev::PedestrianDone, St::Red)
        .on_each(
            &[St::Red, St::Yellow, St::Green, St::PedestrianGreen],
            Ev::Emergency,
            St::Emergency,
        )
        .on_each(
            &[St::Emergency, St::EmergencyFlashOff],
            Ev::ClearEmergency,
            St::Red,
        )
        .on_each(
            &[St::Red, St::Yellow, St::Green, St::PedestrianGreen],
            Ev::Fault,
            St::Fault,
        )
        .on(St::Fault, Ev::ResetFault, St::Red)
        .after(St::Red, config.red(), St::Green)
        .after(St::Yellow, config.yellow(), St::Red)
        .after(St::Green, config.green(), St::Yellow)
        .after(St::PedestrianGreen, config.pedestrian(), St::Red)
        .after(St::Emergency, config.flash(), St::EmergencyFlashOff)
        .after(St::EmergencyFlashOff, config.flash(), St::Emergency)
        .build()?;

    Ok(table)
}

/// Start a light on the authoritative table, in `red` with its timer armed.
pub fn start(scheduler: impl Scheduler + 'static) -> TrafficLight {
    TimedMachine::new(table(), scheduler)
}

/// Start a light with custom phase durations and a weather timing policy.
pub fn start_with(
    config: &TimingConfig,
    weather: Weather,
    scheduler: impl Scheduler + 'static,
) -> Result<TrafficLight, TrafficError> {
    Ok(TimedMachine::with_timing(
        table_with(config)?,
        scheduler,
        weather,
    ))
}

/// Why the light entered a state, as shown next to each history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    Normal,
    Emergency,
    PedestrianRequest,
    FaultDetected,
}

impl TransitionReason {
    /// Reason implied by entering `state`.
    pub fn entering(state: &LightState) -> Self {
        match state {
            LightState::Emergency | LightState::EmergencyFlashOff => Self::Emergency,
            LightState::PedestrianGreen => Self::PedestrianRequest,
            LightState::Fault => Self::FaultDetected,
            LightState::Red | LightState::Yellow | LightState::Green => Self::Normal,
        }
    }

    pub fn of(record: &TransitionRecord<LightState, LightEvent>) -> Self {
        Self::entering(&record.to)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Emergency => "emergency",
            Self::PedestrianRequest => "pedestrian_request",
            Self::FaultDetected => "fault_detected",
        }
    }
}

impl std::fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
