//! Pipeline initialization and shared resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - Logger (with plain/JSON formatting)
//! - Rate limiter (global token bucket)
//! - DNS resolver (from the configured resolver list)
//! - Concurrency semaphore
//!
//! All initialization functions return proper error types for error handling.

mod logger;
mod rate_limiter;
mod resolver;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use logger::init_logger_with;
pub use rate_limiter::{init_rate_limiter, RateLimiter};
pub use resolver::{init_resolver, prepare_resolver};

/// Initializes a semaphore for controlling worker concurrency.
///
/// The semaphore bounds the number of in-flight resolution tasks; the input
/// loop blocks on permit acquisition when all workers are busy.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}
