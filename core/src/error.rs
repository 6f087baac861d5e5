//! Error types for the todo core.
//!
//! # Design
//! `ValidationError` names the offending field so the HTTP layer can report
//! it without parsing messages. `TodoError` is the full taxonomy every
//! `TodoManager` operation returns; each variant maps to exactly one HTTP
//! status. Storage failures are flattened into `Backend` with the driver's
//! message kept for diagnostics.

use std::fmt;

use thiserror::Error;

use crate::todo::TodoId;

/// The mutable fields of a todo, used to label validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Priority,
    Done,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Priority => "priority",
            Field::Done => "done",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate value broke a field invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors returned by `TodoManager` and `TodoStore` operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Input failed a field invariant. Existing state is untouched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No todo with this id exists.
    #[error("todo {0} not found")]
    NotFound(TodoId),

    /// A caller-supplied id did not parse as an integer.
    #[error("invalid id {0:?}: expected an integer")]
    MalformedReference(String),

    /// The storage backend failed; the message comes from the driver.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for TodoError {
    fn from(err: sqlx::Error) -> Self {
        TodoError::Backend(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
