//! Core state machine types.
//!
//! This module contains the pure core of the state machine:
//! - State and event definitions via the `State` and `Event` traits
//! - Immutable, bounded history of transitions and their triggers
//!
//! Nothing in this module schedules timers or holds locks.

mod history;
mod state;

pub use history::{StateHistory, TransitionRecord, Trigger, DEFAULT_HISTORY_CAPACITY};
pub use state::{Event, State};
