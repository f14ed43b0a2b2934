//! Transition and timeout tables, and the outcome of a dispatch.

use crate::core::{Event, State};
use std::collections::HashMap;
use std::time::Duration;

/// Automatic transition fired when a state has been active for `delay`
/// without any other transition superseding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeoutRule<S: State> {
    pub delay: Duration,
    pub target: S,
}

/// Outcome of offering an event to a machine.
///
/// `Accepted` with `from == to` is a real self-transition (its timer is
/// re-armed); `Ignored` means the table has no rule for the pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch<S: State> {
    /// The event matched a rule and the machine moved to `to`.
    Accepted { from: S, to: S },

    /// No rule for the event in `state`; nothing changed.
    Ignored { state: S },
}

impl<S: State> Dispatch<S> {
    /// State of the machine after the dispatch.
    pub fn state(&self) -> &S {
        match self {
            Self::Accepted { to, .. } => to,
            Self::Ignored { state } => state,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    pub fn into_state(self) -> S {
        match self {
            Self::Accepted { to, .. } => to,
            Self::Ignored { state } => state,
        }
    }
}

/// The timer currently armed on a machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTimeout<S: State> {
    /// State the timer was armed for.
    pub state: S,
    /// State entered when it fires.
    pub target: S,
    /// Delay it was scheduled with, after the timing policy was applied.
    pub delay: Duration,
}

/// Complete description of a machine: initial state, event rules and
/// timeout rules.
///
/// Build one with [`TableBuilder`](crate::builder::TableBuilder). The table is
/// immutable once built and is shared by every handle to a machine.
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, E: Event> {
    pub(crate) initial: S,
    pub(crate) rules: HashMap<(S, E), S>,
    pub(crate) timeouts: HashMap<S, TimeoutRule<S>>,
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// State a new machine starts in.
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Target of the rule for `(from, event)`, if one exists (pure).
    pub fn next(&self, from: &S, event: &E) -> Option<&S> {
        self.rules.get(&(from.clone(), event.clone()))
    }

    /// Timeout rule attached to `state`, if any (pure).
    pub fn timeout(&self, state: &S) -> Option<&TimeoutRule<S>> {
        self.timeouts.get(state)
    }

    /// Events with a rule out of `state`.
    pub fn events_from<'a>(&'a self, state: &'a S) -> impl Iterator<Item = &'a E> + 'a {
        self.rules
            .keys()
            .filter(move |(from, _)| from == state)
            .map(|(_, event)| event)
    }

    /// Number of event rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
