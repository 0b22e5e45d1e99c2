//! Rendering error types

use thiserror::Error;

use logtee_record::FieldError;

/// Errors while rendering one record
///
/// Recoverable per record: callers surface the failure as an error record
/// on the terminal and continue.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required field is missing or mistyped
    #[error(transparent)]
    Field(#[from] FieldError),

    /// The record's timestamp does not match the producer format
    #[error("unparseable timestamp '{value}'")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
