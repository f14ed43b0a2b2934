//! Builder API for ergonomic transition table construction.
//!
//! This module provides a fluent table builder and macros for declaring
//! state and event enums with minimal boilerplate.

pub mod error;
pub mod macros;
pub mod table;

pub use error::{BuildError, TableViolation};
pub use table::TableBuilder;
