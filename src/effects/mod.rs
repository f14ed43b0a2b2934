//! Timed state machine operations.
//!
//! This module is the imperative shell around the pure core: it owns the
//! current state, talks to a scheduler for timeout rules and notifies
//! listeners.
//!
//! # Key Concepts
//!
//! - **Transition table**: `(state, event) -> state` rules plus one optional
//!   timeout rule per state
//! - **Scheduler**: the delayed-callback collaborator timeouts run on
//! - **Timed machine**: applies rules, keeps exactly one timer pending and
//!   discards timers that fire after being superseded

mod machine;
#[cfg(feature = "tokio")]
mod runtime;
mod scheduler;
mod transition;

pub use machine::{DispatchStats, Listener, SubscriptionId, TimedMachine, WeakMachine};
#[cfg(feature = "tokio")]
pub use runtime::{SchedulerError, TokioScheduler};
pub use scheduler::{Callback, ManualScheduler, Scheduler, TimerHandle};
pub use transition::{Dispatch, PendingTimeout, TimeoutRule, TransitionTable};
