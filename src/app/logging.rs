//! Progress logging utilities.

use log::info;

use crate::error_handling::ProbeStats;

/// Logs progress information about host processing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `stats` - Shared run statistics
pub fn log_progress(start_time: std::time::Instant, stats: &ProbeStats) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let attempted = stats.attempted();
    let rate = if elapsed_secs > 0.0 {
        attempted as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {} hosts in {:.2} seconds (~{:.2} hosts/sec, {} resolved, {} dropped)",
        attempted,
        elapsed_secs,
        rate,
        stats.resolved(),
        stats.dropped()
    );
}
