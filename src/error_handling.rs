use log::SetLoggerError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the resolver configuration.
    #[error("Resolver configuration error: {0}")]
    ResolverConfigError(String),
}

/// Reasons a host produced no output lines.
///
/// Failed hosts never emit an error line into the results; they are counted
/// here and summarized at the end of the run instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum DropReason {
    /// Resolution failed for every requested record type.
    ResolutionFailed,
    /// The host's resolved IPs fell inside the apex domain's wildcard IP set.
    WildcardFiltered,
}

impl DropReason {
    /// Human-readable label used in the end-of-run summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::ResolutionFailed => "resolution failed",
            DropReason::WildcardFiltered => "wildcard filtered",
        }
    }
}

/// Thread-safe run statistics.
///
/// Tracks attempted, resolved, and dropped host counts using atomic counters,
/// allowing concurrent access from all workers. Shared across tasks via `Arc`.
pub struct ProbeStats {
    attempted: AtomicUsize,
    resolved: AtomicUsize,
    drops: HashMap<DropReason, AtomicUsize>,
}

impl ProbeStats {
    /// Creates a zeroed statistics block with one counter per drop reason.
    pub fn new() -> Self {
        let mut drops = HashMap::new();
        for reason in DropReason::iter() {
            drops.insert(reason, AtomicUsize::new(0));
        }
        ProbeStats {
            attempted: AtomicUsize::new(0),
            resolved: AtomicUsize::new(0),
            drops,
        }
    }

    /// Counts a host taken from the input.
    pub fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a host that resolved and produced output.
    pub fn record_resolved(&self) {
        self.resolved.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a host dropped for the given reason.
    pub fn record_drop(&self, reason: DropReason) {
        // All DropReason variants are initialized in new(), so the lookup
        // cannot miss.
        if let Some(counter) = self.drops.get(&reason) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of hosts taken from the input so far.
    pub fn attempted(&self) -> usize {
        self.attempted.load(Ordering::SeqCst)
    }

    /// Number of hosts that resolved and produced output so far.
    pub fn resolved(&self) -> usize {
        self.resolved.load(Ordering::SeqCst)
    }

    /// Number of hosts dropped for the given reason so far.
    pub fn drop_count(&self, reason: DropReason) -> usize {
        self.drops
            .get(&reason)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total dropped hosts across all reasons.
    pub fn dropped(&self) -> usize {
        DropReason::iter().map(|r| self.drop_count(r)).sum()
    }
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_stats_initialization() {
        let stats = ProbeStats::new();
        assert_eq!(stats.attempted(), 0);
        assert_eq!(stats.resolved(), 0);
        for reason in DropReason::iter() {
            assert_eq!(stats.drop_count(reason), 0);
        }
    }

    #[test]
    fn test_probe_stats_counters() {
        let stats = ProbeStats::new();
        stats.record_attempt();
        stats.record_attempt();
        stats.record_resolved();
        stats.record_drop(DropReason::ResolutionFailed);
        assert_eq!(stats.attempted(), 2);
        assert_eq!(stats.resolved(), 1);
        assert_eq!(stats.drop_count(DropReason::ResolutionFailed), 1);
        assert_eq!(stats.drop_count(DropReason::WildcardFiltered), 0);
        assert_eq!(stats.dropped(), 1);
    }

    #[test]
    fn test_dropped_sums_all_reasons() {
        let stats = ProbeStats::new();
        stats.record_drop(DropReason::ResolutionFailed);
        stats.record_drop(DropReason::WildcardFiltered);
        stats.record_drop(DropReason::WildcardFiltered);
        assert_eq!(stats.dropped(), 3);
    }
}
