//! End-of-run drop statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{DropReason, ProbeStats};

/// Logs a per-reason breakdown of dropped hosts, skipping zero counts.
///
/// Dropped hosts never appear in the output stream, so this summary is the
/// only place their fate is visible.
pub fn print_drop_statistics(stats: &ProbeStats) {
    if stats.dropped() == 0 {
        return;
    }
    for reason in DropReason::iter() {
        let count = stats.drop_count(reason);
        if count > 0 {
            info!("Dropped {} host(s): {}", count, reason.as_str());
        }
    }
}
