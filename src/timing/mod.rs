//! Timeout durations: phase configuration and pluggable timing policies.
//!
//! A [`TimingPolicy`] is consulted every time a machine arms a timeout. It
//! receives the state being entered and the delay from the table's timeout
//! rule, and returns the delay actually scheduled. Conditions that stretch
//! or shorten phases are modeled as policies, never as extra states.
//!
//! # Example
//!
//! ```rust
//! use stoplight::timing::{self, TimingPolicy};
//! use stoplight::traffic::LightState;
//! use std::time::Duration;
//!
//! let doubled = timing::from_fn(|_state: &LightState, base: Duration| base * 2);
//! assert_eq!(
//!     doubled.delay(&LightState::Red, Duration::from_secs(3)),
//!     Duration::from_secs(6)
//! );
//! ```

pub mod config;

pub use config::{ConfigError, ConfigViolation, TimingConfig};

use crate::core::State;
use std::time::Duration;

/// Duration function applied to timeout rules.
pub trait TimingPolicy<S: State>: Send + Sync {
    fn delay(&self, state: &S, base: Duration) -> Duration;
}

/// Policy that schedules every timeout with the table's own delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedTiming;

impl<S: State> TimingPolicy<S> for FixedTiming {
    fn delay(&self, _state: &S, base: Duration) -> Duration {
        base
    }
}

/// Policy backed by a closure. Build one with [`from_fn`].
#[derive(Clone)]
pub struct FnTiming<F> {
    f: F,
}

/// Wrap a closure `(state, base) -> delay` as a policy.
pub fn from_fn<S, F>(f: F) -> FnTiming<F>
where
    S: State,
    F: Fn(&S, Duration) -> Duration + Send + Sync,
{
    FnTiming { f }
}

impl<S, F> TimingPolicy<S> for FnTiming<F>
where
    S: State,
    F: Fn(&S, Duration) -> Duration + Send + Sync,
{
    fn delay(&self, state: &S, base: Duration) -> Duration {
        (self.f)(state, base)
    }
}
