//! Output multiplexer: per-mode rendering and the single writer task.
//!
//! All workers fan in to one `mpsc` channel drained by a single writer task,
//! so lines are serialized in arrival order and never interleaved mid-write.
//! File output is buffered and flushed on every exit path; standard output is
//! written line-by-line, unbuffered.

use std::path::Path;

use log::{debug, warn};
use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::OutputMode;
use crate::engine::DnsResponse;

/// One JSON output line. Field names match the emitted object keys.
#[derive(Serialize)]
pub struct JsonLine {
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "IP")]
    pub ip: String,
}

/// Renders a host's resolution into zero or more output lines.
///
/// Every line carries its own trailing newline so the writer can emit items
/// verbatim. A line that fails JSON serialization is dropped on its own; the
/// remaining lines for the host still go out.
pub fn render_lines(host: &str, response: &DnsResponse, mode: OutputMode) -> Vec<String> {
    if mode == OutputMode::Raw {
        if response.raw.is_empty() {
            return Vec::new();
        }
        return vec![format!("\n{}", response.raw)];
    }

    let mut lines = Vec::with_capacity(response.entries.len());
    for entry in &response.entries {
        // The value is the last tab-delimited token; IP-literal pass-through
        // entries have no tab and are their own value.
        let value = entry.rsplit('\t').next().unwrap_or(entry);
        match mode {
            OutputMode::Ip => lines.push(format!("{value}\n")),
            OutputMode::Domain => lines.push(format!("{host}\n")),
            OutputMode::Simple => lines.push(format!("{host} {value}\n")),
            OutputMode::Response => lines.push(format!("{entry}\n")),
            OutputMode::Full => lines.push(format!("{host} {entry}\n")),
            OutputMode::Json => {
                let json_line = JsonLine {
                    domain: host.to_string(),
                    response: entry.clone(),
                    ip: value.to_string(),
                };
                match serde_json::to_string(&json_line) {
                    Ok(serialized) => lines.push(format!("{serialized}\n")),
                    Err(e) => debug!("Dropping unserializable line for {host}: {e}"),
                }
            }
            OutputMode::Raw => unreachable!("raw mode handled above"),
        }
    }
    lines
}

/// The sink the writer task drains into, opened before the pipeline starts so
/// open failures abort the run up front.
pub enum OutputSink {
    File(BufWriter<tokio::fs::File>),
    Stdout(tokio::io::Stdout),
}

/// Opens the output sink: the file (append-or-create) when a path is given,
/// standard output otherwise.
pub async fn open_sink(path: Option<&Path>) -> std::io::Result<OutputSink> {
    match path {
        Some(path) => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .await?;
            Ok(OutputSink::File(BufWriter::new(file)))
        }
        None => Ok(OutputSink::Stdout(tokio::io::stdout())),
    }
}

/// Spawns the single writer task.
///
/// The task drains the channel until all senders are dropped, then flushes
/// and exits. Exactly one consumer exists, so no two lines ever interleave;
/// cross-host ordering is channel arrival order.
pub fn spawn_writer(mut rx: mpsc::Receiver<String>, sink: OutputSink) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sink {
            OutputSink::File(mut writer) => {
                while let Some(item) = rx.recv().await {
                    if let Err(e) = writer.write_all(item.as_bytes()).await {
                        warn!("Failed to write output line: {e}");
                        break;
                    }
                }
                // Flush whatever made it into the buffer, even after a write
                // error or early channel close.
                if let Err(e) = writer.flush().await {
                    warn!("Failed to flush output file: {e}");
                }
            }
            OutputSink::Stdout(mut stdout) => {
                while let Some(item) = rx.recv().await {
                    if stdout.write_all(item.as_bytes()).await.is_err() {
                        break;
                    }
                    let _ = stdout.flush().await;
                }
            }
        }
    })
}
