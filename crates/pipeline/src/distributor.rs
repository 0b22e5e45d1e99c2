//! Distributor - ingestion loop, stdout path, and teardown protocol
//!
//! The distributor owns the whole pipeline lifecycle: it reads
//! newline-delimited records from the source, forwards a copy of each to
//! the broadcast queue, drives the terminal view, and runs the teardown
//! protocol exactly once when input ends or an interrupt arrives.
//!
//! The only mutable state shared between ingestion and teardown is the
//! gate guarding the broadcast sender and the completion flag; one lock
//! serializes "may I still send" against "close and drain".

use std::borrow::Cow;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use logtee_filter::Filter;
use logtee_record::{Record, Severity};
use logtee_render::Renderer;

use crate::error::Result;
use crate::metrics::DistributorMetrics;

/// The terminal-view half of the distributor
///
/// Applies the optional stdout filter and the severity threshold, then
/// renders. `format` is pure: the caller decides what to do with the
/// produced line.
pub struct StdoutPath {
    filter: Option<Filter>,
    threshold: Severity,
    renderer: Renderer,
}

impl StdoutPath {
    /// Create a stdout path with no filter
    pub fn new(renderer: Renderer, threshold: Severity) -> Self {
        Self {
            filter: None,
            threshold,
            renderer,
        }
    }

    /// Attach the stdout filter (a spec with destination `-`)
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Produce the display line for one record, or `None` if the filter
    /// or the severity threshold drops it
    ///
    /// Records without a `priority` field are never dropped by the
    /// threshold.
    pub fn format(&self, record: &Record) -> Result<Option<String>> {
        let record = match &self.filter {
            Some(filter) => match filter.evaluate(record)? {
                Some(kept) => kept,
                None => return Ok(None),
            },
            None => Cow::Borrowed(record),
        };

        if let Some(priority) = record.priority()
            && !self.threshold.permits(priority)
        {
            return Ok(None);
        }

        Ok(Some(self.renderer.render(&record)?))
    }

    /// Display line for raw text that could not be processed
    ///
    /// The text is wrapped in a synthesized error record and rendered,
    /// bypassing filter and threshold: the operator always sees it.
    pub fn error_line(&self, raw: &str) -> String {
        let record = Record::internal_error(raw);
        self.renderer
            .render(&record)
            .unwrap_or_else(|_| raw.to_string())
    }
}

/// State behind the teardown gate
struct TeardownState {
    /// Sender side of the broadcast queue; `None` once teardown has
    /// begun (or when no file sinks exist)
    broadcast: Option<mpsc::Sender<Record>>,

    /// Broadcaster and sink worker tasks, drained during teardown
    workers: Vec<JoinHandle<()>>,

    /// Set once teardown has finished
    complete: bool,
}

/// Process-wide orchestrator for the record pipeline
///
/// Created once at startup, torn down exactly once: either after input is
/// exhausted or on the first interrupt, whichever happens first. A second
/// teardown request is a no-op; a concurrent one blocks until the first
/// finishes.
pub struct Distributor {
    state: Mutex<TeardownState>,
    stdout: StdoutPath,
    metrics: Arc<DistributorMetrics>,
}

impl Distributor {
    /// Create a distributor
    ///
    /// `broadcast` is the sender side of the broadcaster's inbound queue
    /// (or `None` when no file sinks are configured). `workers` must hold
    /// the broadcaster task and every sink worker task, so teardown can
    /// wait for all of them to drain.
    pub fn new(
        stdout: StdoutPath,
        broadcast: Option<mpsc::Sender<Record>>,
        workers: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            state: Mutex::new(TeardownState {
                broadcast,
                workers,
                complete: false,
            }),
            stdout,
            metrics: Arc::new(DistributorMetrics::new()),
        }
    }

    /// Shared handle to the distributor's metrics
    pub fn metrics_handle(&self) -> Arc<DistributorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Read newline-delimited records from `reader` until end-of-stream,
    /// a fatal read error, or teardown
    ///
    /// Blank lines are skipped. Lines that fail to decode become
    /// synthesized error records: the raw text is rendered to the
    /// terminal and the error record is forwarded to every sink, so
    /// malformed input is never silently dropped. A read error renders a
    /// final error line and returns it; callers still run teardown.
    pub async fn run<R>(&self, reader: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let raw = line.trim();
                    if raw.is_empty() {
                        continue;
                    }
                    self.metrics.record_line();

                    match Record::from_line(raw) {
                        Ok(record) => {
                            if !self.forward(&record).await {
                                break;
                            }
                            self.emit_stdout(&record, raw);
                        }
                        Err(err) => {
                            self.metrics.record_decode_error();
                            tracing::debug!(error = %err, "line is not a valid record");
                            // The operator sees the raw text even though
                            // the pipeline sees the error record.
                            self.print_error(raw);
                            let record = Record::internal_error(raw);
                            if !self.forward(&record).await {
                                break;
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    self.print_error(&err.to_string());
                    return Err(err.into());
                }
            }
        }
        Ok(())
    }

    /// Forward a copy of the record to the broadcast queue
    ///
    /// Checks the teardown gate first, under the shared lock, so a send
    /// can never race the queue being closed. Returns `false` once
    /// teardown has begun: ingestion should stop.
    async fn forward(&self, record: &Record) -> bool {
        let state = self.state.lock().await;
        if state.complete {
            return false;
        }
        if let Some(sender) = &state.broadcast {
            if sender.send(record.clone()).await.is_err() {
                tracing::warn!("broadcast queue closed unexpectedly");
                return false;
            }
            self.metrics.record_broadcast();
        }
        true
    }

    /// Drive the terminal view for one decoded record
    fn emit_stdout(&self, record: &Record, raw: &str) {
        match self.stdout.format(record) {
            Ok(Some(line)) => {
                self.metrics.record_rendered();
                println!("{line}");
            }
            Ok(None) => {}
            Err(err) => {
                self.metrics.record_render_failure();
                tracing::debug!(error = %err, "stdout path rejected record");
                self.print_error(raw);
            }
        }
    }

    fn print_error(&self, raw: &str) {
        println!("{}", self.stdout.error_line(raw));
    }

    /// Run the teardown protocol
    ///
    /// Idempotent and safe to call concurrently from the ingestion path
    /// and a signal handler. Closes the broadcast queue, which cascades:
    /// the broadcaster finishes in-flight sends and closes every sink
    /// queue, each sink drains, flushes and finishes. Blocks until every
    /// worker has completed; in-flight writes are always finished, never
    /// abandoned.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if state.complete {
            return;
        }

        // Closing the inbound queue starts the cascade.
        drop(state.broadcast.take());

        for worker in state.workers.drain(..) {
            if let Err(err) = worker.await {
                tracing::warn!(error = %err, "pipeline worker panicked during teardown");
            }
        }
        state.complete = true;

        let snapshot = self.metrics.snapshot();
        tracing::info!(
            lines_read = snapshot.lines_read,
            decode_errors = snapshot.decode_errors,
            records_broadcast = snapshot.records_broadcast,
            lines_rendered = snapshot.lines_rendered,
            render_failures = snapshot.render_failures,
            "distributor torn down"
        );
    }
}

#[cfg(test)]
#[path = "distributor_test.rs"]
mod distributor_test;
