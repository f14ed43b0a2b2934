//! Core `State` and `Event` traits for table-driven machines.
//!
//! States and events are plain values. All methods are pure - they describe
//! a value without touching the machine that holds it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// A machine holds exactly one `State` value at a time, so an enum whose
/// variants are the operating modes makes a composite or absent state
/// unrepresentable.
///
/// # Required Traits
///
/// - `Clone`: States are copied into history records and notifications
/// - `Eq` + `Hash`: States key the transition and timeout tables
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable for records
///
/// # Example
///
/// ```rust
/// use stoplight::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Lamp {
///     On,
///     Off,
///     Broken,
/// }
///
/// impl State for Lamp {
///     fn name(&self) -> &str {
///         match self {
///             Self::On => "on",
///             Self::Off => "off",
///             Self::Broken => "broken",
///         }
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Broken)
///     }
/// }
///
/// assert_eq!(Lamp::On.name(), "on");
/// assert!(Lamp::Broken.is_error());
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is an error state.
    ///
    /// Error states represent failure conditions that only an explicit
    /// recovery event leaves.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Trait for events offered to a machine.
///
/// Events carry no payload beyond their identity; the transition table maps
/// each `(State, Event)` pair to at most one target.
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
