//! Pipeline wiring and the ingestion entry point
//!
//! Builds the sinks, the broadcaster and the distributor from the parsed
//! command line, installs the interrupt handler, then feeds each input
//! in turn. Teardown runs exactly once on every exit path.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::AsyncRead;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use logtee_filter::{Destination, Filter};
use logtee_pipeline::{
    Broadcaster, DEFAULT_BROADCAST_QUEUE_SIZE, DEFAULT_SINK_QUEUE_SIZE, Distributor, SinkHandle,
    SinkId, StdoutPath,
};
use logtee_record::Severity;
use logtee_render::{RenderOptions, Renderer};
use logtee_sinks::{FileSink, FileSinkConfig};

use crate::Cli;
use crate::preprocess::Preprocessor;

pub async fn run(cli: Cli) -> Result<()> {
    let threshold: Severity = cli
        .priority
        .parse()
        .with_context(|| format!("invalid --priority '{}'", cli.priority))?;

    let renderer = Renderer::new(RenderOptions {
        colors: resolve_colors(cli.colors),
        show_lines: resolve_show_lines(cli.lines),
        show_stacktrace: cli.stacktrace,
        component_width: cli.complen,
        type_width: cli.typelen,
        timespec: cli
            .timespec
            .clone()
            .unwrap_or_else(|| RenderOptions::default().timespec),
    });

    let (stdout_filter, sink_filters) = partition_filters(&cli.filters)?;

    // Every worker the distributor must drain during teardown: one task
    // per file sink plus the broadcaster.
    let mut workers: Vec<JoinHandle<()>> = Vec::new();
    let mut handles = Vec::new();
    for (index, filter) in sink_filters.into_iter().enumerate() {
        let Destination::File(path) = filter.destination().clone() else {
            continue;
        };
        let (tx, rx) = mpsc::channel(DEFAULT_SINK_QUEUE_SIZE);
        let sink = FileSink::new(FileSinkConfig::new(&path), filter, rx)
            .with_context(|| format!("cannot create sink '{}'", path.display()))?;
        handles.push(SinkHandle::new(
            SinkId::new(index as u16),
            path.display().to_string(),
            tx,
        ));
        workers.push(tokio::spawn(async move {
            sink.run().await;
        }));
    }

    let broadcast = if handles.is_empty() {
        None
    } else {
        let (tx, rx) = mpsc::channel(DEFAULT_BROADCAST_QUEUE_SIZE);
        workers.push(tokio::spawn(Broadcaster::new(rx, handles).serve()));
        Some(tx)
    };

    let mut stdout_path = StdoutPath::new(renderer, threshold);
    if let Some(filter) = stdout_filter {
        stdout_path = stdout_path.with_filter(filter);
    }

    let distributor = Arc::new(Distributor::new(stdout_path, broadcast, workers));

    // An interrupt runs the same teardown as end-of-input, then exits
    // nonzero; whichever happens first wins, the gate makes the second a
    // no-op.
    let interrupted = Arc::clone(&distributor);
    tokio::spawn(async move {
        wait_for_interrupt().await;
        tracing::info!("interrupt received, draining sinks");
        interrupted.shutdown().await;
        std::process::exit(1);
    });

    let result = ingest(&distributor, &cli).await;
    // Teardown also runs when ingestion failed, so sinks are flushed on
    // every exit path.
    distributor.shutdown().await;
    result
}

/// Split the parsed filter specs into the stdout filter and file filters
fn partition_filters(specs: &[String]) -> Result<(Option<Filter>, Vec<Filter>)> {
    let mut stdout_filter = None;
    let mut sink_filters = Vec::new();
    for spec in specs {
        let filter =
            Filter::parse(spec).with_context(|| format!("invalid filter spec '{spec}'"))?;
        if filter.is_stdout() {
            if stdout_filter.is_some() {
                tracing::warn!(spec = %spec, "multiple stdout filters given, the last one wins");
            }
            stdout_filter = Some(filter);
        } else {
            sink_filters.push(filter);
        }
    }
    Ok((stdout_filter, sink_filters))
}

/// Feed every configured input through the distributor, in order
async fn ingest(distributor: &Distributor, cli: &Cli) -> Result<()> {
    if cli.files.is_empty() {
        ingest_reader(distributor, cli.jq.as_deref(), tokio::io::stdin()).await
    } else {
        for path in &cli.files {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("cannot open '{}'", path.display()))?;
            ingest_reader(distributor, cli.jq.as_deref(), file).await?;
        }
        Ok(())
    }
}

async fn ingest_reader<R>(distributor: &Distributor, jq: Option<&str>, reader: R) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    match jq {
        Some(filter) => {
            let (preprocessor, output) =
                Preprocessor::spawn(filter, reader).context("cannot start jq preprocessor")?;
            let result = distributor.run(output).await;
            preprocessor.shutdown().await;
            result?;
        }
        None => distributor.run(reader).await?,
    }
    Ok(())
}

/// Resolve whether the rendered view is colorized
///
/// Colors are dropped when stdout is not a terminal unless
/// `LOGTEE_FORCE_COLORS` insists.
fn resolve_colors(flag: bool) -> bool {
    if !flag {
        return false;
    }
    if atty::is(atty::Stream::Stdout) {
        return true;
    }
    env_bool("LOGTEE_FORCE_COLORS").unwrap_or(false)
}

/// `LOGTEE_SHOW_LINES` overrides the --lines flag
fn resolve_show_lines(flag: bool) -> bool {
    env_bool("LOGTEE_SHOW_LINES").unwrap_or(flag)
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| v.parse::<bool>().ok())
}

/// Wait for an interrupt-class signal
async fn wait_for_interrupt() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler");
        let mut quit = signal::unix::signal(signal::unix::SignalKind::quit())
            .expect("failed to install signal handler");
        tokio::select! {
            _ = term.recv() => {},
            _ = quit.recv() => {},
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
