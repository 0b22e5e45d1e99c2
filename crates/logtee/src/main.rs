//! Logtee - filtered fan-out for structured JSON logs
//!
//! Reads newline-delimited JSON records, renders a live human-readable
//! view to the terminal and distributes every record to independently
//! filtered output files, optionally gzip/zstd compressed.
//!
//! # Usage
//!
//! ```bash
//! # Render a log stream
//! scanner | logtee
//!
//! # Keep everything in a compressed archive, errors in a second file
//! scanner | logtee -f ':all.log.zst' -f 'priority=3:errors.log'
//!
//! # Only show scanner messages on the terminal, at notice or above
//! logtee -p notice -f 'scanner:-' run.log
//! ```

mod preprocess;
mod run;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Distribute structured log records to filtered outputs and render a
/// human-readable view
#[derive(Parser, Debug)]
#[command(name = "logtee")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Write records to a destination through a filter spec
    /// (`[selector][%fields]:path`, destination `-` is the terminal)
    #[arg(short = 'f', long = "filter", value_name = "SPEC")]
    pub filters: Vec<String>,

    /// Drop records below this priority from the terminal view
    /// (named level or 0-7)
    #[arg(short = 'p', long, default_value = "debug", value_name = "LEVEL")]
    pub priority: String,

    /// Timestamp format of the rendered view (chrono format string)
    #[arg(short = 's', long, value_name = "FMT")]
    pub timespec: Option<String>,

    /// Width of the component column
    #[arg(short = 'c', long, default_value_t = 8, value_name = "N")]
    pub complen: usize,

    /// Width of the type column
    #[arg(short = 't', long, default_value_t = 8, value_name = "N")]
    pub typelen: usize,

    /// Colorize output based on priorities
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub colors: bool,

    /// Show line numbers if available
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub lines: bool,

    /// Show stacktraces if available
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub stacktrace: bool,

    /// Run jq as a preprocessor with this filter
    #[arg(short = 'j', long, value_name = "FILTER")]
    pub jq: Option<String>,

    /// Diagnostics level on stderr (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    /// Input files (stdin when omitted)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;
    run::run(cli).await
}

/// Initialize the tracing subscriber for diagnostics
///
/// Diagnostics go to stderr; stdout belongs to the rendered view.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("warn"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(atty::is(atty::Stream::Stderr))
                .with_target(false),
        )
        .with(filter)
        .init();

    Ok(())
}
