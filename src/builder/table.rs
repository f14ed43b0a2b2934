//! Builder for constructing transition tables.

use crate::builder::error::{BuildError, TableViolation};
use crate::core::{Event, State};
use crate::effects::{TimeoutRule, TransitionTable};
use std::collections::HashMap;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TableViolation>>;

/// Builder for constructing transition tables with a fluent API.
///
/// `build` validates the whole table at once and reports every violation,
/// not only the first.
///
/// # Example
///
/// ```
/// use stoplight::builder::TableBuilder;
/// use stoplight::{event_enum, state_enum};
/// use std::time::Duration;
///
/// state_enum! {
///     enum Beacon {
///         Lit => "lit",
///         Dark => "dark",
///     }
/// }
///
/// event_enum! {
///     enum BeaconEvent {
///         Toggle => "TOGGLE",
///     }
/// }
///
/// let table = TableBuilder::new()
///     .initial(Beacon::Dark)
///     .on(Beacon::Dark, BeaconEvent::Toggle, Beacon::Lit)
///     .on(Beacon::Lit, BeaconEvent::Toggle, Beacon::Dark)
///     .after(Beacon::Lit, Duration::from_millis(250), Beacon::Dark)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.next(&Beacon::Dark, &BeaconEvent::Toggle), Some(&Beacon::Lit));
/// ```
pub struct TableBuilder<S: State, E: Event> {
    initial: Option<S>,
    rules: Vec<(S, E, S)>,
    timeouts: Vec<(S, TimeoutRule<S>)>,
}

impl<S: State, E: Event> TableBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            rules: Vec::new(),
            timeouts: Vec::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a rule: `event` in `from` moves the machine to `to`.
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.rules.push((from, event, to));
        self
    }

    /// Add the same rule for several source states.
    pub fn on_each(mut self, from: &[S], event: E, to: S) -> Self {
        for state in from {
            self.rules.push((state.clone(), event.clone(), to.clone()));
        }
        self
    }

    /// Add a timeout rule: after `delay` in `state`, move to `target`.
    pub fn after(mut self, state: S, delay: Duration, target: S) -> Self {
        self.timeouts.push((state, TimeoutRule { delay, target }));
        self
    }

    /// Build the table.
    /// Returns an error if required fields are missing or any rule is invalid.
    pub fn build(self) -> Result<TransitionTable<S, E>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        if self.rules.is_empty() {
            return Err(BuildError::NoRules);
        }

        let mut checks: Vec<Check> = Vec::new();

        let mut rules = HashMap::with_capacity(self.rules.len());
        for (from, event, to) in self.rules {
            let key = (from, event);
            let check = if rules.contains_key(&key) {
                Validation::fail(TableViolation::DuplicateRule {
                    state: key.0.name().to_string(),
                    event: key.1.name().to_string(),
                })
            } else {
                rules.insert(key, to);
                Validation::success(())
            };
            checks.push(check);
        }

        let mut timeouts = HashMap::with_capacity(self.timeouts.len());
        for (state, rule) in self.timeouts {
            if rule.delay.is_zero() {
                checks.push(Validation::fail(TableViolation::ZeroDelay {
                    state: state.name().to_string(),
                }));
            }
            let check = if timeouts.contains_key(&state) {
                Validation::fail(TableViolation::DuplicateTimeout {
                    state: state.name().to_string(),
                })
            } else {
                timeouts.insert(state, rule);
                Validation::success(())
            };
            checks.push(check);
        }

        match Validation::all_vec(checks) {
            Validation::Success(_) => Ok(TransitionTable {
                initial,
                rules,
                timeouts,
            }),
            Validation::Failure(violations) => {
                Err(BuildError::Invalid(violations.iter().cloned().collect()))
            }
        }
    }
}

impl<S: State, E: Event> Default for TableBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
