//! Pipeline error types

use thiserror::Error;

use logtee_filter::FilterError;
use logtee_render::RenderError;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unrecoverable error on the ingestion stream
    #[error("input stream error: {0}")]
    Read(#[from] std::io::Error),

    /// The stdout filter could not be applied to a record
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A record could not be rendered for the terminal
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
