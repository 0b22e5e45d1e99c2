//! External `jq` preprocessor
//!
//! Treats `jq` as an opaque line-stream transform sitting in front of the
//! distributor: input lines are validated and piped into the subprocess,
//! its stdout becomes the ingestion stream. Lines that are not valid
//! records are converted to serialized error records before jq sees
//! them, so nothing disappears inside the preprocessor.

use std::io;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;

use logtee_record::Record;

/// A running `jq -c --unbuffered <filter>` subprocess
pub struct Preprocessor {
    child: Child,
    feeder: JoinHandle<()>,
}

impl Preprocessor {
    /// Start jq and the feeder task; returns the preprocessor handle and
    /// the output stream to ingest from
    pub fn spawn<R>(filter: &str, input: R) -> io::Result<(Self, ChildStdout)>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut child = Command::new("jq")
            .arg("-c")
            .arg("--unbuffered")
            .arg(filter)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("jq stdin unavailable"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("jq stdout unavailable"))?;

        let feeder = tokio::spawn(feed(input, stdin));
        Ok((Self { child, feeder }, stdout))
    }

    /// Stop the subprocess and reap it
    pub async fn shutdown(mut self) {
        self.feeder.abort();
        if let Err(err) = self.child.kill().await {
            tracing::debug!(error = %err, "jq already exited");
        }
        let _ = self.child.wait().await;
    }
}

/// Pipe input lines into jq, replacing undecodable ones with serialized
/// error records
async fn feed<R>(input: R, mut stdin: ChildStdin)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                let payload = if Record::from_line(raw).is_ok() {
                    raw.to_string()
                } else {
                    match serde_json::to_string(&Record::internal_error(raw)) {
                        Ok(encoded) => encoded,
                        Err(_) => continue,
                    }
                };
                if write_line(&mut stdin, &payload).await.is_err() {
                    // jq went away; stop feeding.
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                if let Ok(encoded) = serde_json::to_string(&Record::internal_error(&err.to_string()))
                {
                    let _ = write_line(&mut stdin, &encoded).await;
                }
                break;
            }
        }
    }
    // Dropping stdin closes jq's input and lets it finish.
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await
}
