//! Logtee - Rendering
//!
//! Turns one record into one human-readable display string. Stateless:
//! rendering is a pure function of the record and the options, with no
//! I/O of its own.
//!
//! # Example Output
//!
//! ```text
//! Apr  2 12:48:08.906 {scanner } [msg     ]: Starting tshark
//! Apr  2 12:48:09.102 {parser  } [trace   ]: frame 1 decoded (parse.c:88)
//! ```

mod error;
mod render;

pub use error::RenderError;
pub use render::{RenderOptions, Renderer};
