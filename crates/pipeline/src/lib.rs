//! Logtee - Pipeline
//!
//! The concurrent record-distribution core: one ingestion stream fanned
//! out to every sink queue, plus the live terminal view.
//!
//! # Architecture
//!
//! ```text
//! [Ingestion]                  [Broadcaster]                [Sink workers]
//!   stdin/file ──→ Distributor ──→ mpsc::Receiver ──→ Arc<Record> ──→ queue ──→ file
//!        │                                            └───────────→ queue ──→ file.gz
//!        └──→ stdout path (filter → threshold → render) ──→ terminal
//! ```
//!
//! # Key Design
//!
//! - **Channel-based**: `tokio::sync::mpsc` bounded queues everywhere
//! - **Arc fan-out**: one allocation per record, shared across sinks
//! - **Blocking backpressure**: a slow sink throttles the broadcast and,
//!   transitively, ingestion; records are never dropped
//! - **Ordered**: each sink sees records in input order
//! - **Idempotent teardown**: close-then-drain cascade behind one lock,
//!   safe to trigger concurrently from end-of-input and a signal handler

mod broadcaster;
mod distributor;
mod error;
mod metrics;
mod sink_handle;

pub use broadcaster::Broadcaster;
pub use distributor::{Distributor, StdoutPath};
pub use error::{PipelineError, Result};
pub use metrics::{BroadcastMetrics, BroadcastSnapshot, DistributorMetrics, DistributorSnapshot};
pub use sink_handle::{SinkHandle, SinkId};

/// Default buffer size for sink queues
pub const DEFAULT_SINK_QUEUE_SIZE: usize = 1024;

/// Default buffer size for the broadcast inbound queue
pub const DEFAULT_BROADCAST_QUEUE_SIZE: usize = 1024;
