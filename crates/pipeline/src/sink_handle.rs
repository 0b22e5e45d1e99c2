//! Sink handle for pipeline communication
//!
//! `SinkHandle` wraps a channel sender and sink identifier, letting the
//! broadcaster feed sinks without knowing their concrete types.

use std::sync::Arc;

use tokio::sync::mpsc;

use logtee_record::Record;

/// Sink identifier
///
/// A lightweight Copy handle naming one sink; assigned sequentially at
/// startup in filter-spec order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SinkId(u16);

impl SinkId {
    /// Create a new sink ID from a numeric index
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Get the numeric index of this sink
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sink:{}", self.0)
    }
}

/// Handle to one sink's inbound queue
///
/// Records are wrapped in `Arc` so fan-out to many sinks shares one
/// allocation. Sends block when the queue is full: backpressure is the
/// delivery guarantee, nothing is dropped.
pub struct SinkHandle {
    id: SinkId,

    /// Human-readable name (the destination path) for logging
    name: String,

    sender: mpsc::Sender<Arc<Record>>,
}

impl SinkHandle {
    /// Create a new sink handle
    #[inline]
    pub fn new(id: SinkId, name: impl Into<String>, sender: mpsc::Sender<Arc<Record>>) -> Self {
        Self {
            id,
            name: name.into(),
            sender,
        }
    }

    /// Get the sink's identifier
    #[inline]
    pub fn id(&self) -> SinkId {
        self.id
    }

    /// Get the sink's name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Send a record, waiting while the queue is full
    ///
    /// Returns `Err` with the record only if the sink's queue has closed.
    #[inline]
    pub async fn send(&self, record: Arc<Record>) -> std::result::Result<(), Arc<Record>> {
        self.sender.send(record).await.map_err(|e| e.0)
    }

    /// Check if the sink queue is closed
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining capacity of the queue
    #[inline]
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}

impl std::fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}
