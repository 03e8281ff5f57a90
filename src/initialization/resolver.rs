//! DNS resolver initialization.
//!
//! This module builds the `hickory-resolver` instance from the configured
//! resolver list with proper timeout and retry configuration.

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::DNS_TIMEOUT_SECS;
use crate::error_handling::InitializationError;
use hickory_resolver::config::{NameServerConfig, Protocol, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

/// Normalizes a resolver endpoint string, appending `:53` when no port is
/// given. Bare IPv6 addresses must already be written as `[addr]:port`.
pub fn prepare_resolver(resolver: &str) -> String {
    let resolver = resolver.trim();
    if resolver.contains(':') {
        resolver.to_string()
    } else {
        format!("{resolver}:53")
    }
}

/// Initializes the DNS resolver over the given endpoint list.
///
/// Each endpoint is a `host[:port]` string; queries are retried across the
/// whole list up to `retries` attempts before an error surfaces. Timeouts are
/// aggressive to avoid hanging a worker on an unresponsive resolver, and
/// search-domain appending is disabled so hostnames resolve as written.
///
/// # Errors
///
/// Returns `InitializationError::ResolverConfigError` if the list is empty or
/// an endpoint does not parse as a socket address.
pub fn init_resolver(
    resolvers: &[String],
    retries: usize,
) -> Result<TokioAsyncResolver, InitializationError> {
    let mut name_servers = Vec::with_capacity(resolvers.len());
    for endpoint in resolvers {
        let addr: SocketAddr = prepare_resolver(endpoint).parse().map_err(|e| {
            InitializationError::ResolverConfigError(format!(
                "invalid resolver endpoint {endpoint:?}: {e}"
            ))
        })?;
        name_servers.push(NameServerConfig::new(addr, Protocol::Udp));
    }

    if name_servers.is_empty() {
        return Err(InitializationError::ResolverConfigError(
            "resolver list is empty".to_string(),
        ));
    }

    let config = ResolverConfig::from_parts(None, vec![], name_servers);

    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = retries.max(1);
    // Prevent search-domain appending; hosts are queried exactly as given
    opts.ndots = 0;

    Ok(TokioAsyncResolver::tokio(config, opts))
}
