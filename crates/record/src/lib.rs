//! Logtee - Record model
//!
//! The in-memory representation of one structured log record: an ordered
//! field mapping decoded from a single JSON line, with checked accessors
//! for the fields downstream components rely on (`timestamp`, `component`,
//! `type`, `data`, `priority`, ...).
//!
//! Records that fail to decode are never dropped; they are replaced by a
//! synthesized error record (see [`Record::internal_error`]) carrying the
//! raw input text, so malformed input flows through the same pipeline as
//! everything else.

mod error;
mod record;
mod severity;

pub use error::FieldError;
pub use record::Record;
pub use severity::{Severity, SeverityError};
