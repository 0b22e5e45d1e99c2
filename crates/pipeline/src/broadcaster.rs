//! Broadcaster - explicit fan-out of one record stream to every sink
//!
//! The broadcaster owns the single inbound queue and the list of sink
//! queues it replicates to. Replication is an explicit send-to-each loop
//! in registration order, so delivery order and closure semantics stay
//! auditable: every sink receives every record broadcast before the
//! inbound queue closed, in broadcast order.

use std::sync::Arc;

use tokio::sync::mpsc;

use logtee_record::Record;

use crate::metrics::BroadcastMetrics;
use crate::sink_handle::SinkHandle;

/// Fans the inbound record queue out to every registered sink queue
///
/// # Design
///
/// - Records are wrapped in `Arc` once and shared across sinks
/// - Sends block on full sink queues: a slow sink delays the whole
///   broadcast, which is the intended backpressure
/// - When the inbound queue closes, every sink queue is closed in turn
///   (the handles are dropped), cascading shutdown to the workers
pub struct Broadcaster {
    /// Inbound queue fed by the distributor
    receiver: mpsc::Receiver<Record>,

    /// Sink queues in registration order; fixed at startup
    sinks: Vec<SinkHandle>,

    metrics: Arc<BroadcastMetrics>,
}

impl Broadcaster {
    /// Create a broadcaster over the given inbound queue and sinks
    pub fn new(receiver: mpsc::Receiver<Record>, sinks: Vec<SinkHandle>) -> Self {
        Self {
            receiver,
            sinks,
            metrics: Arc::new(BroadcastMetrics::new()),
        }
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Shared handle to the broadcaster's metrics
    ///
    /// Remains valid after `serve()` consumes the broadcaster.
    pub fn metrics_handle(&self) -> Arc<BroadcastMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run until the inbound queue closes, then close every sink queue
    pub async fn serve(mut self) {
        tracing::debug!(sink_count = self.sinks.len(), "broadcaster starting");

        while let Some(record) = self.receiver.recv().await {
            self.metrics.record_received();

            let record = Arc::new(record);
            for sink in &self.sinks {
                match sink.send(Arc::clone(&record)).await {
                    Ok(()) => self.metrics.record_replicated(),
                    Err(_) => {
                        // A dead sink never aborts the broadcast; the
                        // remaining sinks still get the record.
                        self.metrics.record_failed_send();
                        tracing::warn!(
                            sink_id = %sink.id(),
                            sink = %sink.name(),
                            "sink queue closed before shutdown, record not delivered"
                        );
                    }
                }
            }
        }

        // Dropping the handles closes every sink queue; workers drain
        // their remaining records, flush and finish.
        let snapshot = self.metrics.snapshot();
        tracing::info!(
            records_received = snapshot.records_received,
            records_replicated = snapshot.records_replicated,
            failed_sends = snapshot.failed_sends,
            "broadcaster shutting down"
        );
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "broadcaster_test.rs"]
mod broadcaster_test;
