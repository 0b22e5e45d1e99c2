//! File sink worker
//!
//! Consumes records from a dedicated queue, applies the sink's filter and
//! writes kept records as JSON lines through the compression chain. Lives
//! from startup until the queue is closed and drained.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use logtee_filter::Filter;
use logtee_record::Record;

use crate::common::{SinkError, SinkMetrics, SinkSnapshot};
use crate::writer::{Compression, RecordWrite};
use crate::{DEFAULT_BUFFER_SIZE, DEFAULT_QUEUE_SIZE};

/// Configuration for a file sink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Output destination; the extension selects the compression
    pub path: PathBuf,

    /// Inbound queue size
    pub queue_size: usize,

    /// Write buffer size
    pub buffer_size: usize,
}

impl FileSinkConfig {
    /// Create a config for the given destination with defaults
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            queue_size: DEFAULT_QUEUE_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    #[must_use]
    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

/// One filtered, optionally compressed output destination
///
/// Per-record failures (filter evaluation, encoding, writing) are counted
/// and skipped; they never terminate the worker. Only queue closure ends
/// the run, after which the writer is flushed and finished so no partial
/// frame survives teardown.
pub struct FileSink {
    receiver: mpsc::Receiver<Arc<Record>>,
    filter: Filter,
    writer: Box<dyn RecordWrite>,
    compression: Compression,

    /// Destination path, used as the sink's display name
    name: String,

    metrics: Arc<SinkMetrics>,
}

impl FileSink {
    /// Create a sink, opening its output file eagerly
    ///
    /// File creation failure is startup-fatal: the caller reports it and
    /// never begins ingestion.
    pub fn new(
        config: FileSinkConfig,
        filter: Filter,
        receiver: mpsc::Receiver<Arc<Record>>,
    ) -> Result<Self, SinkError> {
        let compression = Compression::from_path(&config.path);
        let writer =
            compression
                .open(&config.path, config.buffer_size)
                .map_err(|source| SinkError::Create {
                    path: config.path.clone(),
                    source,
                })?;

        Ok(Self {
            receiver,
            filter,
            writer,
            compression,
            name: config.path.display().to_string(),
            metrics: Arc::new(SinkMetrics::new()),
        })
    }

    /// Shared handle to the sink's metrics
    ///
    /// Remains valid after `run()` consumes the sink.
    pub fn metrics_handle(&self) -> Arc<SinkMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The sink's display name (its destination path)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compression chosen for this destination
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Run the worker until the queue is closed and drained
    pub async fn run(mut self) -> SinkSnapshot {
        tracing::info!(
            sink = %self.name,
            compression = %self.compression,
            "file sink starting"
        );

        while let Some(record) = self.receiver.recv().await {
            self.metrics.record_received();
            self.process(&record);
        }

        // Queue closed: flush buffers and finish the compression frame.
        // Failures here are reported but must not keep other sinks from
        // completing their own teardown.
        let mut writer = self.writer;
        if let Err(err) = writer.flush_all() {
            self.metrics.record_write_error();
            tracing::error!(sink = %self.name, error = %err, "flush failed during teardown");
        }
        if let Err(err) = writer.finish() {
            self.metrics.record_write_error();
            tracing::error!(sink = %self.name, error = %err, "close failed during teardown");
        }

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            sink = %self.name,
            records_received = snapshot.records_received,
            records_written = snapshot.records_written,
            records_filtered = snapshot.records_filtered,
            filter_errors = snapshot.filter_errors,
            write_errors = snapshot.write_errors,
            bytes = snapshot.bytes_written,
            "file sink shutting down"
        );
        snapshot
    }

    /// Filter and write one record; errors are per-record and non-fatal
    fn process(&mut self, record: &Record) {
        let kept: Cow<'_, Record> = match self.filter.evaluate(record) {
            Ok(Some(kept)) => kept,
            Ok(None) => {
                self.metrics.record_filtered();
                return;
            }
            Err(err) => {
                self.metrics.record_filter_error();
                tracing::debug!(sink = %self.name, error = %err, "filter not applicable, record skipped");
                return;
            }
        };

        if let Err(err) = self.write_record(&kept) {
            self.metrics.record_write_error();
            tracing::warn!(sink = %self.name, error = %err, "record write failed, continuing");
        }
    }

    fn write_record(&mut self, record: &Record) -> Result<(), SinkError> {
        use std::io::Write;

        let encoded = serde_json::to_vec(record)?;
        self.writer.write_all(&encoded)?;
        self.writer.write_all(b"\n")?;
        self.metrics.record_written(encoded.len() as u64 + 1);
        Ok(())
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("name", &self.name)
            .field("compression", &self.compression)
            .finish()
    }
}

#[cfg(test)]
#[path = "file_sink_test.rs"]
mod file_sink_test;
