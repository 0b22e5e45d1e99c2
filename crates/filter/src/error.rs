//! Filter error types

use thiserror::Error;

/// Errors while parsing a filter spec (startup-fatal)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    /// The spec has no `:destination` part, or it is empty
    #[error("filter spec '{0}' has no destination")]
    MissingDestination(String),

    /// The selector contains an empty matcher token or value
    #[error("filter spec '{0}' contains an empty matcher")]
    EmptyMatcher(String),

    /// The projection list contains an empty field name
    #[error("filter spec '{0}' contains an empty projection field")]
    EmptyProjection(String),
}

/// Errors while evaluating a filter against one record
///
/// Recoverable: every caller treats a failed predicate as a rejection of
/// that one record for that one destination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A matched field holds a structured value that cannot be compared
    #[error("field '{0}' holds a structured value and cannot be matched")]
    Unmatchable(String),
}
