//! Stoplight: a table-driven traffic light state machine
//!
//! The light is a finite-state machine whose behavior is entirely described
//! by a transition table: `(state, event) -> state` rules plus at most one
//! timed auto-transition per state. The machine holds exactly one state,
//! ignores events the table has no rule for, and keeps a single pending
//! timer that every transition cancels before arming the next.
//!
//! # Core Concepts
//!
//! - **State / Event**: fieldless enums implementing the `State` and `Event`
//!   traits, usually declared with `state_enum!` and `event_enum!`
//! - **Transition table**: built and validated with `TableBuilder`
//! - **Scheduler**: the delayed-callback service timeouts run on;
//!   `ManualScheduler` is a virtual clock for tests and simulations
//! - **Timing policy**: a pluggable duration function applied to every
//!   timeout, e.g. `traffic::Weather`
//!
//! # Example
//!
//! ```rust
//! use stoplight::effects::ManualScheduler;
//! use stoplight::traffic::{self, LightEvent, LightState};
//! use std::time::Duration;
//!
//! let clock = ManualScheduler::new();
//! let light = traffic::start(clock.clone());
//!
//! assert_eq!(light.state(), LightState::Red);
//! assert_eq!(light.dispatch(LightEvent::Next).state(), &LightState::Green);
//!
//! // Green lasts 3s, then yellow 1s.
//! clock.advance(Duration::from_millis(3000));
//! assert_eq!(light.state(), LightState::Yellow);
//!
//! // Yellow has no pedestrian rule: ignored, not an error.
//! assert!(!light.dispatch(LightEvent::PedestrianRequest).is_accepted());
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod timing;
pub mod traffic;

// Re-export commonly used types
pub use builder::TableBuilder;
pub use core::{Event, State, StateHistory, TransitionRecord, Trigger};
pub use effects::{Dispatch, ManualScheduler, Scheduler, TimedMachine};
pub use traffic::{LightEvent, LightState, TrafficLight};
