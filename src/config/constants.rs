//! Configuration constants.
//!
//! This module defines the default operational parameters used throughout the
//! application: concurrency, retry budget, resolver endpoints, and timeouts.

// constants (used as defaults)
/// Default number of concurrent resolution workers
pub const DEFAULT_CONCURRENCY: usize = 250;
/// Default retry budget per DNS query (attempts across the resolver list)
pub const DEFAULT_RETRIES: usize = 2;
/// Default number of random-probe rounds during wildcard detection
pub const DEFAULT_WILDCARD_THRESHOLD: usize = 5;
/// Interval between progress log lines, in seconds
pub const LOGGING_INTERVAL_SECS: u64 = 10;

// Network operation timeouts
/// DNS query timeout in seconds
/// Most queries complete in <1s; 5s provides buffer while still failing fast
/// on unresponsive resolvers.
pub const DNS_TIMEOUT_SECS: u64 = 5;

/// Default resolver endpoints, used when no resolver file is supplied.
///
/// These are large public resolvers with high availability; queries fail over
/// across them inside the resolution engine.
pub const DEFAULT_RESOLVERS: &[&str] = &[
    "1.1.1.1:53", // Cloudflare
    "1.0.0.1:53", // Cloudflare
    "8.8.8.8:53", // Google
    "8.8.4.4:53", // Google
    "9.9.9.9:53", // Quad9
];

/// Length of the random label used for wildcard probes.
/// Long enough that a collision with a real subdomain is not a practical concern.
pub const RANDOM_LABEL_LEN: usize = 13;
