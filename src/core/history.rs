//! Bounded, immutable record of the transitions a machine has
//! taken, each tagged with what triggered it.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of records a history keeps unless told otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// What caused a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "", rename_all = "snake_case")]
pub enum Trigger<E: Event> {
    /// An event offered through `dispatch`.
    Event(E),
    /// The state's timeout rule fired after `after` elapsed.
    Timeout { after: Duration },
}

impl<E: Event> Trigger<E> {
    /// The triggering event, if the transition was not timed.
    pub fn event(&self) -> Option<&E> {
        match self {
            Self::Event(event) => Some(event),
            Self::Timeout { .. } => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Event(event) => event.name(),
            Self::Timeout { .. } => "timeout",
        }
    }
}

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use stoplight::core::{TransitionRecord, Trigger};
/// use stoplight::traffic::{LightEvent, LightState};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: LightState::Red,
///     to: LightState::Green,
///     trigger: Trigger::Event(LightEvent::Next),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.trigger.event(), Some(&LightEvent::Next));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State, E: Event> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// The event or timeout that caused the transition
    pub trigger: Trigger<E>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition appended, dropping the oldest record once `capacity` is
/// reached.
///
/// # Example
///
/// ```rust
/// use stoplight::core::{StateHistory, TransitionRecord, Trigger};
/// use stoplight::traffic::{LightEvent, LightState};
/// use chrono::Utc;
///
/// let history = StateHistory::new();
///
/// let history = history.record(TransitionRecord {
///     from: LightState::Red,
///     to: LightState::Green,
///     trigger: Trigger::Event(LightEvent::Next),
///     timestamp: Utc::now(),
/// });
///
/// let history = history.record(TransitionRecord {
///     from: LightState::Green,
///     to: LightState::Yellow,
///     trigger: Trigger::Event(LightEvent::Next),
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Red -> Green -> Yellow
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    capacity: usize,
    transitions: Vec<TransitionRecord<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create a new empty history holding [`DEFAULT_HISTORY_CAPACITY`] records.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a new empty history holding at most `capacity` records.
    ///
    /// A capacity of zero keeps nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: Vec::new(),
        }
    }

    /// A copy of this history with `transition` appended.
    pub fn record(&self, transition: TransitionRecord<S, E>) -> Self {
        if self.capacity == 0 {
            return self.clone();
        }
        let skip = (self.transitions.len() + 1).saturating_sub(self.capacity);
        let mut transitions: Vec<_> = self.transitions.iter().skip(skip).cloned().collect();
        transitions.push(transition);
        Self {
            capacity: self.capacity,
            transitions,
        }
    }

    /// States visited: the `from` of the oldest retained record, then the
    /// `to` of each record.
    pub fn get_path(&self) -> Vec<&S> {
        self.transitions
            .first()
            .map(|first| &first.from)
            .into_iter()
            .chain(self.transitions.iter().map(|record| &record.to))
            .collect()
    }

    /// Wall-clock span between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.transitions.first()?;
        let last = self.transitions.last()?;
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Most recent transition.
    pub fn latest(&self) -> Option<&TransitionRecord<S, E>> {
        self.transitions.last()
    }

    /// Maximum number of records retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get all retained transitions, oldest first.
    pub fn transitions(&self) -> &[TransitionRecord<S, E>] {
        &self.transitions
    }
}
