//! dns_sweep library: bulk DNS resolution over host lists.
//!
//! This library resolves large lists of hostnames (or URLs, normalized to
//! their host) concurrently against a pool of DNS resolvers, with a global
//! queries-per-second ceiling, selectable record types, several output
//! renderings, and optional wildcard-DNS detection and filtering.
//!
//! # Example
//!
//! ```no_run
//! use dns_sweep::{run_probe, Config, OutputMode};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     hosts_file: Some(PathBuf::from("hosts.txt")),
//!     concurrency: 100,
//!     output_mode: OutputMode::Json,
//!     ..Default::default()
//! };
//!
//! let report = run_probe(config).await?;
//! println!("Resolved {} of {} hosts", report.resolved, report.attempted);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

mod app;
pub mod config;
mod engine;
mod error_handling;
pub mod initialization;
mod output;
pub mod wildcard;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OutputMode, RecordType};
pub use engine::{DnsClient, DnsData, DnsResponse};
pub use error_handling::{DropReason, InitializationError, ProbeStats};
pub use run::{run_probe, ProbeReport};
pub use wildcard::WildcardDetection;

// Internal run module (contains the main pipeline logic)
mod run {
    use anyhow::{Context, Result};
    use std::sync::Arc;
    use std::time::Duration;

    use log::{debug, info, warn};
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::sync::mpsc;
    use tokio::task::JoinSet;
    use tokio_util::sync::CancellationToken;

    use crate::app::{extract_hostname, log_progress, print_drop_statistics};
    use crate::config::{Config, OutputMode, DEFAULT_RESOLVERS, LOGGING_INTERVAL_SECS};
    use crate::engine::DnsClient;
    use crate::error_handling::{DropReason, ProbeStats};
    use crate::initialization::{init_rate_limiter, init_semaphore, RateLimiter};
    use crate::output::{open_sink, render_lines, spawn_writer};
    use crate::wildcard;

    /// Results of a resolution run.
    ///
    /// Contains summary statistics about the completed sweep.
    #[derive(Debug, Clone)]
    pub struct ProbeReport {
        /// Number of hosts taken from the input
        pub attempted: usize,
        /// Number of hosts that resolved and produced output
        pub resolved: usize,
        /// Number of hosts dropped (resolution failure or wildcard filter)
        pub dropped: usize,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Wildcard filtering parameters, shared read-only across workers.
    struct WildcardFilter {
        apex: String,
        rounds: usize,
    }

    /// Runs a resolution sweep with the provided configuration.
    ///
    /// This is the main entry point for the library. It reads hostnames from
    /// the input file (or stdin), resolves them concurrently, and streams
    /// rendered lines to the configured sink.
    ///
    /// # Errors
    ///
    /// This function will return an error before any concurrency starts if:
    /// - The hosts file or resolvers file cannot be opened
    /// - The output file cannot be opened
    /// - The resolver list is empty or contains an invalid endpoint
    ///
    /// Per-host resolution failures never abort the run; the affected host
    /// is dropped from the output and counted in the report.
    pub async fn run_probe(config: Config) -> Result<ProbeReport> {
        let resolvers = match &config.resolvers_file {
            Some(path) => {
                let contents = tokio::fs::read_to_string(path)
                    .await
                    .context("Failed to read resolvers file")?;
                let endpoints: Vec<String> = contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(str::to_string)
                    .collect();
                info!("Loaded {} resolver(s) from {}", endpoints.len(), path.display());
                endpoints
            }
            None => DEFAULT_RESOLVERS.iter().map(|r| r.to_string()).collect(),
        };

        let client = Arc::new(
            DnsClient::new(&resolvers, config.retries, config.record_types())
                .context("Failed to configure DNS client")?,
        );

        let is_stdin = config
            .hosts_file
            .as_ref()
            .map(|p| p.as_os_str() == "-")
            .unwrap_or(true);

        let mut stdin_lines = if is_stdin {
            info!("Reading hosts from stdin");
            Some(BufReader::new(tokio::io::stdin()).lines())
        } else {
            None
        };

        let mut file_lines = if !is_stdin {
            // is_stdin is false only when hosts_file is Some
            let path = config.hosts_file.as_ref().context("hosts file not set")?;
            let file = tokio::fs::File::open(path)
                .await
                .context("Failed to open hosts file")?;
            Some(BufReader::new(file).lines())
        } else {
            None
        };

        // Open the sink up front so a bad output path aborts before any work
        let sink = open_sink(config.output_file.as_deref())
            .await
            .context("Failed to open output file")?;
        let (tx, rx) = mpsc::channel::<String>(config.concurrency.max(1));
        let writer = spawn_writer(rx, sink);

        let semaphore = init_semaphore(config.concurrency);
        let rate_limiter = init_rate_limiter(config.rate_limit_qps);
        let stats = Arc::new(ProbeStats::new());
        let start_time = std::time::Instant::now();

        let cancel = CancellationToken::new();
        let cancel_logging = cancel.child_token();
        let stats_for_logging = Arc::clone(&stats);
        let logging_task = (!config.silent).then(|| {
            tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL_SECS));
                // The first tick fires immediately; skip it
                interval.tick().await;
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            log_progress(start_time, &stats_for_logging);
                        }
                        _ = cancel_logging.cancelled() => {
                            break;
                        }
                    }
                }
            })
        });

        let wildcard_filter = config.wildcard_domain.clone().map(|apex| {
            Arc::new(WildcardFilter {
                apex,
                rounds: config.wildcard_threshold,
            })
        });

        let mut tasks = JoinSet::new();

        loop {
            let line_result = if is_stdin {
                match stdin_lines.as_mut() {
                    Some(lines) => lines.next_line().await,
                    None => break,
                }
            } else {
                match file_lines.as_mut() {
                    Some(lines) => lines.next_line().await,
                    None => break,
                }
            };
            let line = match line_result {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read line from input: {e}");
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let host = extract_hostname(trimmed);

            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Semaphore closed, skipping host: {host}");
                    continue;
                }
            };

            stats.record_attempt();

            let client = Arc::clone(&client);
            let limiter = rate_limiter.as_ref().map(|(l, _)| Arc::clone(l));
            let stats_for_task = Arc::clone(&stats);
            let tx_for_task = tx.clone();
            let wildcard_for_task = wildcard_filter.clone();
            let mode = config.output_mode;
            tasks.spawn(async move {
                let _permit = permit;
                process_host(
                    host,
                    client,
                    limiter,
                    mode,
                    wildcard_for_task,
                    stats_for_task,
                    tx_for_task,
                )
                .await;
            });

            // Reap finished tasks as we go so the set stays bounded by the
            // semaphore width instead of growing with the input.
            while let Some(task_result) = tasks.try_join_next() {
                if let Err(join_error) = task_result {
                    warn!("Worker task panicked: {join_error:?}");
                }
            }
        }

        // Shutdown order is load-bearing: every worker must exit before the
        // output channel closes, and the writer must drain before the run
        // reports completion.
        while let Some(task_result) = tasks.join_next().await {
            if let Err(join_error) = task_result {
                warn!("Worker task panicked: {join_error:?}");
            }
        }

        cancel.cancel();
        if let Some(task) = logging_task {
            let _ = task.await;
        }
        if let Some((_, shutdown)) = &rate_limiter {
            shutdown.cancel();
        }

        drop(tx);
        writer.await.context("Output writer task failed")?;

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        if !config.silent {
            log_progress(start_time, &stats);
            print_drop_statistics(&stats);
        }

        Ok(ProbeReport {
            attempted: stats.attempted(),
            resolved: stats.resolved(),
            dropped: stats.dropped(),
            elapsed_seconds,
        })
    }

    /// Resolves one host and streams its rendered lines to the writer.
    ///
    /// Failures are isolated: a host that does not resolve, or whose IPs fall
    /// inside the apex wildcard set, is counted and dropped without output.
    async fn process_host(
        host: String,
        client: Arc<DnsClient>,
        limiter: Option<Arc<RateLimiter>>,
        mode: OutputMode,
        wildcard_filter: Option<Arc<WildcardFilter>>,
        stats: Arc<ProbeStats>,
        tx: mpsc::Sender<String>,
    ) {
        if let Some(ref limiter) = limiter {
            limiter.acquire().await;
        }

        let response = match client.resolve_raw(&host).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Resolution failed for {host}: {e}");
                stats.record_drop(DropReason::ResolutionFailed);
                return;
            }
        };

        if let Some(filter) = wildcard_filter {
            let detection =
                wildcard::detect(&client, &host, &filter.apex, filter.rounds, limiter.as_deref())
                    .await;
            if detection.wildcarded {
                debug!("Dropping {host}: indistinguishable from wildcard under {}", filter.apex);
                stats.record_drop(DropReason::WildcardFiltered);
                return;
            }
        }

        stats.record_resolved();
        for line in render_lines(&host, &response, mode) {
            // A closed channel means the writer is gone; nothing left to do
            if tx.send(line).await.is_err() {
                break;
            }
        }
    }
}
