//! Field access errors
//!
//! Missing or mistyped record fields produce a typed, recoverable error
//! instead of a runtime fault.

use thiserror::Error;

/// Error produced by checked field accessors on [`crate::Record`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field is not present in the record
    #[error("missing field '{0}'")]
    Missing(String),

    /// The field is present but holds an unexpected value shape
    #[error("field '{field}' is not a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

impl FieldError {
    /// Create a missing-field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }

    /// Create a wrong-type error
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.into(),
            expected,
        }
    }
}
