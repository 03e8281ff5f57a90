//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and programmatic configuration of the resolution pipeline.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_RETRIES, DEFAULT_WILDCARD_THRESHOLD,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// DNS record types that can be requested per host.
///
/// The configured set is non-empty; an empty selection falls back to `[A]`
/// (see [`Config::record_types`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
#[allow(missing_docs)] // Variant names are the record types themselves
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Ns,
    Ptr,
    Mx,
    Soa,
    Txt,
}

impl RecordType {
    /// The canonical upper-case name of the record type ("A", "AAAA", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Ns => "NS",
            RecordType::Ptr => "PTR",
            RecordType::Mx => "MX",
            RecordType::Soa => "SOA",
            RecordType::Txt => "TXT",
        }
    }
}

/// How each resolved value is rendered on its output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// The resolved value alone
    Ip,
    /// The hostname alone
    Domain,
    /// `<hostname> <value>`
    Simple,
    /// The raw `type\tvalue` response entry
    Response,
    /// `<hostname> <type>\t<value>`
    Full,
    /// One JSON object per line: `{"Domain":..,"Response":..,"IP":..}`
    Json,
    /// The resolver's raw response text, dig-style
    Raw,
}

/// Pipeline configuration.
///
/// Doubles as the CLI surface (via `clap::Parser`) and the programmatic
/// library configuration (via `Default` plus struct update syntax).
///
/// # Examples
///
/// ```no_run
/// use dns_sweep::{Config, OutputMode};
/// use std::path::PathBuf;
///
/// let config = Config {
///     hosts_file: Some(PathBuf::from("hosts.txt")),
///     concurrency: 100,
///     output_mode: OutputMode::Json,
///     ..Default::default()
/// };
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "dns_sweep", version, about)]
pub struct Config {
    /// File with hostnames or URLs, one per line (stdin when omitted or "-")
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub hosts_file: Option<PathBuf>,

    /// File with resolver endpoints (host[:port], one per line); replaces the built-in defaults
    #[arg(short = 's', long = "resolvers", value_name = "FILE")]
    pub resolvers_file: Option<PathBuf>,

    /// Record types to query (repeatable)
    #[arg(
        short = 'r',
        long = "record-type",
        value_enum,
        ignore_case = true,
        default_values_t = vec![RecordType::A]
    )]
    pub record_types: Vec<RecordType>,

    /// Number of concurrent resolution workers
    #[arg(short = 't', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Retry budget per DNS query (attempts across the resolver list)
    #[arg(short = 'c', long, default_value_t = DEFAULT_RETRIES)]
    pub retries: usize,

    /// Global queries-per-second ceiling across all workers (0 = unlimited)
    #[arg(long = "rate-limit", value_name = "QPS", default_value_t = 0)]
    pub rate_limit_qps: u32,

    /// Output rendering mode
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        ignore_case = true,
        default_value_t = OutputMode::Simple
    )]
    pub output_mode: OutputMode,

    /// Output file, append-or-create (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Apex domain for wildcard detection; hosts resolving into the wildcard IP set are dropped
    #[arg(short = 'd', long = "wildcard-domain", value_name = "DOMAIN")]
    pub wildcard_domain: Option<String>,

    /// Random-probe rounds per host during wildcard detection
    #[arg(long = "wildcard-threshold", default_value_t = DEFAULT_WILDCARD_THRESHOLD)]
    pub wildcard_threshold: usize,

    /// Show only results (suppresses progress logging and the summary line)
    #[arg(long)]
    pub silent: bool,

    /// Log level
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    /// The effective record-type set: CLI occurrence order, duplicates
    /// removed, never empty (falls back to `[A]`).
    pub fn record_types(&self) -> Vec<RecordType> {
        let mut seen = std::collections::HashSet::new();
        let mut types: Vec<RecordType> = self
            .record_types
            .iter()
            .copied()
            .filter(|t| seen.insert(*t))
            .collect();
        if types.is_empty() {
            types.push(RecordType::A);
        }
        types
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: None,
            resolvers_file: None,
            record_types: vec![RecordType::A],
            concurrency: DEFAULT_CONCURRENCY,
            retries: DEFAULT_RETRIES,
            rate_limit_qps: 0,
            output_mode: OutputMode::Simple,
            output_file: None,
            wildcard_domain: None,
            wildcard_threshold: DEFAULT_WILDCARD_THRESHOLD,
            silent: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
