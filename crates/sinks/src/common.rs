//! Common sink types
//!
//! Metrics and errors shared by sink machinery.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Per-sink counters
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Records received from the queue
    pub records_received: AtomicU64,

    /// Records encoded and written
    pub records_written: AtomicU64,

    /// Records rejected by the sink's filter
    pub records_filtered: AtomicU64,

    /// Records the filter could not be applied to
    pub filter_errors: AtomicU64,

    /// Encode/write/flush failures
    pub write_errors: AtomicU64,

    /// Bytes handed to the writer (before compression)
    pub bytes_written: AtomicU64,
}

impl SinkMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            records_received: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            records_filtered: AtomicU64::new(0),
            filter_errors: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_received(&self) {
        self.records_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_written(&self, bytes: u64) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_filtered(&self) {
        self.records_filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_filter_error(&self) {
        self.filter_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> SinkSnapshot {
        SinkSnapshot {
            records_received: self.records_received.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            records_filtered: self.records_filtered.load(Ordering::Relaxed),
            filter_errors: self.filter_errors.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkSnapshot {
    pub records_received: u64,
    pub records_written: u64,
    pub records_filtered: u64,
    pub filter_errors: u64,
    pub write_errors: u64,
    pub bytes_written: u64,
}

/// Sink errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// Output file could not be created (startup-fatal)
    #[error("failed to create '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
