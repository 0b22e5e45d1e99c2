//! Logtee - Sinks
//!
//! File sink workers: each sink owns one open output handle, one optional
//! streaming compressor, one dedicated inbound queue and one filter. A
//! sink consumes records until its queue closes, then flushes its buffer,
//! finishes the compression frame and closes the file — on every shutdown
//! path, including the signal-triggered one.
//!
//! # Output
//!
//! Kept records are encoded as newline-delimited JSON. The compressor is
//! chosen once at creation from the destination's extension:
//!
//! ```text
//! out.log      plain buffered writes
//! out.log.gz   gzip framing
//! out.log.zst  zstd framing
//! ```

mod common;
mod file_sink;
mod writer;

pub use common::{SinkError, SinkMetrics, SinkSnapshot};
pub use file_sink::{FileSink, FileSinkConfig};
pub use writer::{Compression, RecordWrite};

/// Default queue size for a sink's inbound channel
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Default write buffer size (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
