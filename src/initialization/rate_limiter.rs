//! Rate limiter initialization.
//!
//! This module provides a token-bucket rate limiter that enforces a global
//! queries-per-second ceiling across all workers.

use std::sync::Arc;
use tokio::sync::Semaphore as TokioSemaphore;
use tokio::time::{interval, Duration as TokioDuration};

/// Token-bucket rate limiter shared by all resolution workers.
///
/// Tokens are replenished by a background task at the configured
/// queries-per-second rate; each query consumes one token, and callers block
/// (FIFO, via the semaphore's fair queue) when the bucket is empty.
///
/// The bucket starts with a single token and its capacity is capped at one
/// replenishment interval's worth, so an idle pipeline cannot bank a burst:
/// N acquisitions at limit R take at least (N-1)/R seconds end-to-end.
pub struct RateLimiter {
    permits: Arc<TokioSemaphore>,
    capacity: usize,
    shutdown: tokio_util::sync::CancellationToken,
}

impl RateLimiter {
    /// Blocks until the caller is permitted to issue the next query.
    pub async fn acquire(&self) {
        // The semaphore is never closed while the limiter is alive; forget()
        // consumes the token instead of returning it on drop.
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }

    /// Maximum tokens the bucket can hold.
    #[allow(dead_code)] // Useful for debugging/monitoring
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        // Stop the replenishment task; it must not outlive the limiter.
        self.shutdown.cancel();
    }
}

/// Initializes the token-bucket rate limiter.
///
/// If `qps` is 0, rate limiting is disabled and `None` is returned; callers
/// then skip acquisition entirely.
///
/// # Arguments
///
/// * `qps` - Queries per second across the whole worker pool (0 disables)
///
/// # Returns
///
/// A tuple of `(RateLimiter, CancellationToken)` when enabled. The
/// cancellation token stops the background replenishment task.
pub fn init_rate_limiter(
    qps: u32,
) -> Option<(Arc<RateLimiter>, tokio_util::sync::CancellationToken)> {
    if qps == 0 {
        return None;
    }

    // One ticker interval's worth of tokens, at least 1.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let capacity = ((f64::from(qps) / 10.0).ceil() as usize).max(1);

    let shutdown = tokio_util::sync::CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    // Start with a single token; the ticker fills the bucket. A full initial
    // bucket would let the first `capacity` callers through instantly.
    let limiter = Arc::new(RateLimiter {
        permits: Arc::new(TokioSemaphore::new(1)),
        capacity,
        shutdown: shutdown_clone.clone(),
    });

    let permits = limiter.permits.clone();
    let mut ticker = interval(TokioDuration::from_millis(100));
    tokio::spawn(async move {
        let mut last_time = tokio::time::Instant::now();
        // Track fractional tokens so low rates (e.g. 3 qps) don't starve.
        let mut fractional_tokens = 0.0f64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = tokio::time::Instant::now();
                    let elapsed = now.duration_since(last_time);
                    last_time = now;

                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let due = f64::from(qps) * elapsed.as_secs_f64() + fractional_tokens;
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let whole = due as usize;
                    fractional_tokens = due - whole as f64;

                    // Tokens beyond the bucket capacity are discarded; a full
                    // bucket means nobody is waiting.
                    let room = capacity.saturating_sub(permits.available_permits());
                    let grant = whole.min(room);
                    if grant > 0 {
                        permits.add_permits(grant);
                    }
                }
                _ = shutdown_clone.cancelled() => {
                    log::debug!("Rate limiter background task shutting down");
                    break;
                }
            }
        }
    });

    Some((limiter, shutdown))
}
