//! Pipeline metrics
//!
//! Lock-free counters for the broadcaster and the distributor, with
//! point-in-time snapshots logged at shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for the broadcaster
#[derive(Debug, Default)]
pub struct BroadcastMetrics {
    /// Records received on the inbound queue
    pub records_received: AtomicU64,

    /// Successful per-sink replications (one per sink per record)
    pub records_replicated: AtomicU64,

    /// Sends that found a sink queue already closed
    pub failed_sends: AtomicU64,
}

impl BroadcastMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            records_received: AtomicU64::new(0),
            records_replicated: AtomicU64::new(0),
            failed_sends: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_received(&self) {
        self.records_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_replicated(&self) {
        self.records_replicated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failed_send(&self) {
        self.failed_sends.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> BroadcastSnapshot {
        BroadcastSnapshot {
            records_received: self.records_received.load(Ordering::Relaxed),
            records_replicated: self.records_replicated.load(Ordering::Relaxed),
            failed_sends: self.failed_sends.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of broadcaster metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSnapshot {
    pub records_received: u64,
    pub records_replicated: u64,
    pub failed_sends: u64,
}

/// Metrics for the distributor's ingestion loop
#[derive(Debug, Default)]
pub struct DistributorMetrics {
    /// Non-blank input lines consumed
    pub lines_read: AtomicU64,

    /// Lines that failed to decode into a record
    pub decode_errors: AtomicU64,

    /// Records handed to the broadcast queue
    pub records_broadcast: AtomicU64,

    /// Lines rendered to the terminal view
    pub lines_rendered: AtomicU64,

    /// Records the stdout path failed to filter or render
    pub render_failures: AtomicU64,
}

impl DistributorMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            lines_read: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            records_broadcast: AtomicU64::new(0),
            lines_rendered: AtomicU64::new(0),
            render_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_line(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_broadcast(&self) {
        self.records_broadcast.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rendered(&self) {
        self.lines_rendered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_render_failure(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> DistributorSnapshot {
        DistributorSnapshot {
            lines_read: self.lines_read.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            records_broadcast: self.records_broadcast.load(Ordering::Relaxed),
            lines_rendered: self.lines_rendered.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of distributor metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistributorSnapshot {
    pub lines_read: u64,
    pub decode_errors: u64,
    pub records_broadcast: u64,
    pub lines_rendered: u64,
    pub render_failures: u64,
}
