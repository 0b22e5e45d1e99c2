//! Logtee - Filters
//!
//! Filter specs bind a match predicate (plus optional field projection) to
//! one output destination. Each sink owns exactly one filter; evaluation
//! is a pure function of the record and the filter's own configuration,
//! so filters for different sinks run concurrently without coordination.
//!
//! # Spec grammar
//!
//! ```text
//! spec        := [selector] ['%' fields] ':' destination
//! selector    := matcher (',' matcher)*      empty selector matches all
//! matcher     := key '=' value | value       bare value is component=value
//! fields      := name (',' name)*            project onto these fields
//! destination := path | '-'                  '-' renders to the terminal
//! ```
//!
//! Matchers sharing a key OR together; distinct keys AND together. The
//! first `:` splits selector from destination, so destination paths may
//! contain colons.
//!
//! # Example
//!
//! ```
//! use logtee_filter::Filter;
//! use logtee_record::Record;
//!
//! let filter = Filter::parse("scanner,parser:scan.log.gz").unwrap();
//! assert!(!filter.is_stdout());
//!
//! let record = Record::from_line(r#"{"component":"scanner","type":"msg"}"#).unwrap();
//! assert!(filter.evaluate(&record).unwrap().is_some());
//! ```

mod destination;
mod error;
mod filter;

pub use destination::Destination;
pub use error::{FilterError, FilterParseError};
pub use filter::Filter;
