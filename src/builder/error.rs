//! Build errors for transition tables.

use thiserror::Error;

/// A single problem found while validating a transition table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableViolation {
    #[error("Rule for event '{event}' in state '{state}' defined more than once")]
    DuplicateRule { state: String, event: String },

    #[error("Timeout for state '{state}' defined more than once")]
    DuplicateTimeout { state: String },

    #[error("Timeout for state '{state}' has a zero delay")]
    ZeroDelay { state: String },
}

/// Errors that can occur when building a transition table.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No rules defined. Add at least one rule with .on(from, event, to)")]
    NoRules,

    #[error("Transition table has {} violation(s): {}", .0.len(), join(.0))]
    Invalid(Vec<TableViolation>),
}

fn join(violations: &[TableViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
