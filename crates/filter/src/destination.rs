//! Filter destinations

use std::fmt;
use std::path::PathBuf;

/// Where a filter's kept records go
///
/// The sentinel `-` is reserved for the terminal view; it never opens a
/// file and never gets its own worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Render to the terminal (the `-` sentinel)
    Stdout,
    /// Write encoded records to this file
    File(PathBuf),
}

impl Destination {
    /// Parse a destination token from a filter spec
    pub fn from_spec(spec: &str) -> Self {
        if spec == "-" {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(spec))
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("-"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
