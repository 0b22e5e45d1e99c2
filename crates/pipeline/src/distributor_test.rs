//! Distributor tests
//!
//! End-to-end coverage of the ingestion loop, the teardown protocol, and
//! the stdout path decision logic.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use logtee_filter::Filter;
use logtee_record::{Record, Severity};
use logtee_render::{RenderOptions, Renderer};

use crate::{Broadcaster, Distributor, SinkHandle, SinkId, StdoutPath};

fn plain_stdout(threshold: Severity) -> StdoutPath {
    StdoutPath::new(
        Renderer::new(RenderOptions {
            colors: false,
            ..RenderOptions::default()
        }),
        threshold,
    )
}

/// A sink worker that collects everything it receives
fn collecting_sink(
    capacity: usize,
) -> (SinkHandle, JoinHandle<()>, Arc<Mutex<Vec<Record>>>) {
    let (tx, mut rx) = mpsc::channel::<Arc<Record>>(capacity);
    let collected = Arc::new(Mutex::new(Vec::new()));
    let store = Arc::clone(&collected);
    let worker = tokio::spawn(async move {
        while let Some(record) = rx.recv().await {
            store.lock().unwrap().push((*record).clone());
        }
    });
    (
        SinkHandle::new(SinkId::new(0), "collector", tx),
        worker,
        collected,
    )
}

/// Wire a distributor with one collecting sink behind a broadcaster
fn distributor_with_sink(threshold: Severity) -> (Distributor, Arc<Mutex<Vec<Record>>>) {
    let (tx, rx) = mpsc::channel(16);
    let (handle, worker, collected) = collecting_sink(16);
    let broadcaster = Broadcaster::new(rx, vec![handle]);
    let broadcast_task = tokio::spawn(broadcaster.serve());
    let distributor = Distributor::new(
        plain_stdout(threshold),
        Some(tx),
        vec![broadcast_task, worker],
    );
    (distributor, collected)
}

#[tokio::test]
async fn test_records_reach_sink_in_input_order() {
    let (distributor, collected) = distributor_with_sink(Severity::Debug);

    let input = "\
{\"timestamp\":\"2020-04-02T12:48:08.906523\",\"component\":\"a\",\"type\":\"msg\",\"data\":\"one\"}\n\
{\"timestamp\":\"2020-04-02T12:48:09.000000\",\"component\":\"b\",\"type\":\"msg\",\"data\":\"two\"}\n\
\n\
{\"timestamp\":\"2020-04-02T12:48:10.000000\",\"component\":\"c\",\"type\":\"msg\",\"data\":\"three\"}\n";

    distributor.run(input.as_bytes()).await.unwrap();
    distributor.shutdown().await;

    let records = collected.lock().unwrap();
    let components: Vec<String> = records
        .iter()
        .map(|r| r.component().unwrap().to_string())
        .collect();
    assert_eq!(components, ["a", "b", "c"]);

    let snapshot = distributor.metrics_handle().snapshot();
    assert_eq!(snapshot.lines_read, 3); // blank line skipped
    assert_eq!(snapshot.records_broadcast, 3);
    assert_eq!(snapshot.decode_errors, 0);
}

#[tokio::test]
async fn test_malformed_line_becomes_error_record() {
    let (distributor, collected) = distributor_with_sink(Severity::Debug);

    let input = "\
{\"timestamp\":\"2020-04-02T12:48:08.906523\",\"component\":\"a\",\"type\":\"msg\",\"data\":\"ok\"}\n\
this is not json\n\
{\"timestamp\":\"2020-04-02T12:48:10.000000\",\"component\":\"b\",\"type\":\"msg\",\"data\":\"ok\"}\n";

    distributor.run(input.as_bytes()).await.unwrap();
    distributor.shutdown().await;

    let records = collected.lock().unwrap();
    assert_eq!(records.len(), 3);
    // Malformed input is forwarded as a synthesized error record, in
    // its original stream position.
    assert_eq!(records[1].component().unwrap(), "INTERNAL");
    assert_eq!(records[1].message_type().unwrap(), "ERROR");
    assert_eq!(records[1].data_text().unwrap(), "this is not json");

    let snapshot = distributor.metrics_handle().snapshot();
    assert_eq!(snapshot.decode_errors, 1);
    assert_eq!(snapshot.records_broadcast, 3);
}

#[tokio::test]
async fn test_threshold_drops_stdout_but_not_sinks() {
    // Priority 6 (info) against a notice (5) threshold: dropped from the
    // terminal view, still delivered to the sink.
    let (distributor, collected) = distributor_with_sink("notice".parse().unwrap());

    let input = "{\"timestamp\":\"2020-04-02T12:48:08.906523\",\"component\":\"scanner\",\"type\":\"msg\",\"data\":\"Starting tshark\",\"priority\":6}\n";
    distributor.run(input.as_bytes()).await.unwrap();
    distributor.shutdown().await;

    assert_eq!(collected.lock().unwrap().len(), 1);
    let snapshot = distributor.metrics_handle().snapshot();
    assert_eq!(snapshot.lines_rendered, 0);
    assert_eq!(snapshot.records_broadcast, 1);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let (distributor, collected) = distributor_with_sink(Severity::Debug);

    let input = "{\"timestamp\":\"2020-04-02T12:48:08.906523\",\"component\":\"a\",\"type\":\"msg\",\"data\":\"x\"}\n";
    distributor.run(input.as_bytes()).await.unwrap();

    distributor.shutdown().await;
    let after_first = collected.lock().unwrap().len();
    // Second teardown is a no-op: no panic, no double-close, same output.
    distributor.shutdown().await;
    assert_eq!(collected.lock().unwrap().len(), after_first);
    assert_eq!(after_first, 1);
}

#[tokio::test]
async fn test_concurrent_shutdown() {
    let (distributor, _collected) = distributor_with_sink(Severity::Debug);
    let distributor = Arc::new(distributor);

    let a = Arc::clone(&distributor);
    let b = Arc::clone(&distributor);
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { a.shutdown().await }),
        tokio::spawn(async move { b.shutdown().await }),
    );
    ra.unwrap();
    rb.unwrap();
}

#[tokio::test]
async fn test_ingestion_stops_after_teardown() {
    let (distributor, collected) = distributor_with_sink(Severity::Debug);
    distributor.shutdown().await;

    let input = "{\"timestamp\":\"2020-04-02T12:48:08.906523\",\"component\":\"a\",\"type\":\"msg\",\"data\":\"x\"}\n";
    distributor.run(input.as_bytes()).await.unwrap();

    assert!(collected.lock().unwrap().is_empty());
    assert_eq!(distributor.metrics_handle().snapshot().records_broadcast, 0);
}

#[tokio::test]
async fn test_runs_without_sinks() {
    let distributor = Distributor::new(plain_stdout(Severity::Debug), None, Vec::new());

    let input = "\
{\"timestamp\":\"2020-04-02T12:48:08.906523\",\"component\":\"a\",\"type\":\"msg\",\"data\":\"x\"}\n\
garbage line\n";
    distributor.run(input.as_bytes()).await.unwrap();
    distributor.shutdown().await;

    let snapshot = distributor.metrics_handle().snapshot();
    assert_eq!(snapshot.lines_read, 2);
    assert_eq!(snapshot.decode_errors, 1);
    assert_eq!(snapshot.records_broadcast, 0);
}

// ============================================================================
// StdoutPath decision logic
// ============================================================================

fn record(line: &str) -> Record {
    Record::from_line(line).unwrap()
}

#[test]
fn test_stdout_path_threshold() {
    let path = plain_stdout(Severity::Notice);

    let info = record(r#"{"timestamp":"2020-04-02T12:48:08.906523","component":"c","type":"msg","data":"x","priority":6}"#);
    assert!(path.format(&info).unwrap().is_none());

    let notice = record(r#"{"timestamp":"2020-04-02T12:48:08.906523","component":"c","type":"msg","data":"x","priority":5}"#);
    assert!(path.format(&notice).unwrap().is_some());

    // Absent priority is never filtered by the threshold.
    let bare = record(r#"{"timestamp":"2020-04-02T12:48:08.906523","component":"c","type":"msg","data":"x"}"#);
    assert!(path.format(&bare).unwrap().is_some());
}

#[test]
fn test_stdout_path_threshold_monotonic() {
    for t in 0..=7u64 {
        let path = plain_stdout(Severity::from_value(t).unwrap());
        for p2 in 0..=7u64 {
            let less_severe = record(&format!(
                r#"{{"timestamp":"2020-04-02T12:48:08.906523","component":"c","type":"msg","data":"x","priority":{p2}}}"#
            ));
            if path.format(&less_severe).unwrap().is_some() {
                for p1 in 0..p2 {
                    let more_severe = record(&format!(
                        r#"{{"timestamp":"2020-04-02T12:48:08.906523","component":"c","type":"msg","data":"x","priority":{p1}}}"#
                    ));
                    assert!(
                        path.format(&more_severe).unwrap().is_some(),
                        "threshold {t}: kept p={p2} but dropped p={p1}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_stdout_path_filter() {
    let filter = Filter::parse("scanner:-").unwrap();
    let path = plain_stdout(Severity::Debug).with_filter(filter);

    let hit = record(r#"{"timestamp":"2020-04-02T12:48:08.906523","component":"scanner","type":"msg","data":"x"}"#);
    assert!(path.format(&hit).unwrap().is_some());

    let miss = record(r#"{"timestamp":"2020-04-02T12:48:08.906523","component":"parser","type":"msg","data":"x"}"#);
    assert!(path.format(&miss).unwrap().is_none());
}

#[test]
fn test_stdout_path_error_line_carries_raw_text() {
    let path = plain_stdout(Severity::Debug);
    let line = path.error_line("{half a record");
    assert!(line.contains("{INTERNAL}"));
    assert!(line.contains("{half a record"));
}
