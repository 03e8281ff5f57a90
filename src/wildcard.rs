//! Wildcard DNS detection.
//!
//! A zone with a catch-all record answers every nonexistent subdomain with
//! the same IPs, which makes resolved host lists under that apex worthless.
//! Detection resolves the host itself alongside randomly-labeled probe names
//! that are guaranteed not to exist; when the host's own IPs intersect the
//! probes' IPs, the host is indistinguishable from wildcard noise.
//!
//! Probes are generated at every subdomain depth, not just under the apex:
//! a `*.staging.example.com` record would be missed by probing only
//! `<rand>.example.com`.

use std::collections::HashSet;

use log::debug;
use rand::distr::Alphanumeric;
use rand::Rng;

use crate::config::RANDOM_LABEL_LEN;
use crate::engine::DnsClient;
use crate::initialization::RateLimiter;

/// Outcome of a wildcard-detection pass for one host.
#[derive(Debug, Clone, Default)]
pub struct WildcardDetection {
    /// True when the host's own IPs intersect the probe IPs.
    pub wildcarded: bool,
    /// All IPs observed across the random probes. Callers may exclude any
    /// other host under the same apex whose resolved IP falls in this set.
    pub wildcard_ips: HashSet<String>,
}

/// Decides whether `host` is indistinguishable from wildcard noise under
/// `apex`.
///
/// Runs `rounds` independent probe rounds (fresh random labels each round);
/// every round's probe IPs accumulate into one wildcard set before the
/// verdict. Per-probe failures contribute nothing. If every query fails, the
/// verdict is not-wildcarded with an empty set.
pub async fn detect(
    client: &DnsClient,
    host: &str,
    apex: &str,
    rounds: usize,
    limiter: Option<&RateLimiter>,
) -> WildcardDetection {
    let mut orig: HashSet<String> = HashSet::new();
    let mut wildcards: HashSet<String> = HashSet::new();

    if let Some(limiter) = limiter {
        limiter.acquire().await;
    }
    match client.query_one(host).await {
        Ok(data) => orig.extend(data.a),
        Err(e) => debug!("Wildcard check: original host {host} did not resolve: {e}"),
    }

    for _ in 0..rounds.max(1) {
        for probe in probe_hosts(host, apex) {
            if let Some(limiter) = limiter {
                limiter.acquire().await;
            }
            match client.query_one(&probe).await {
                Ok(data) => wildcards.extend(data.a),
                // Probes are expected to fail on healthy zones
                Err(e) => debug!("Wildcard probe {probe} did not resolve: {e}"),
            }
        }
    }

    WildcardDetection {
        wildcarded: is_wildcarded(&orig, &wildcards),
        wildcard_ips: wildcards,
    }
}

/// True when any of the host's own IPs also came back for a random probe.
pub(crate) fn is_wildcarded(orig: &HashSet<String>, wildcards: &HashSet<String>) -> bool {
    orig.iter().any(|ip| wildcards.contains(ip))
}

/// Builds one round of random probe hostnames for `host` under `apex`:
/// one probe directly under the apex, plus one per subdomain depth of the
/// host, each preserving the suffix structure below the random label.
///
/// `a.b.example.com` under `example.com` yields probes of the shape
/// `<rand>.example.com`, `<rand>.a.b.example.com`, `<rand>.b.example.com`.
pub(crate) fn probe_hosts(host: &str, apex: &str) -> Vec<String> {
    let tokens = subdomain_tokens(host, apex);

    let mut probes = Vec::with_capacity(tokens.len() + 1);
    probes.push(format!("{}.{}", random_label(), apex));
    for i in 0..tokens.len() {
        probes.push(format!(
            "{}.{}.{}",
            random_label(),
            tokens[i..].join("."),
            apex
        ));
    }
    probes
}

/// The host's subdomain labels above the apex, outermost first. Empty when
/// the host is the apex itself or does not sit under it, so no malformed
/// probe can be built from it.
fn subdomain_tokens(host: &str, apex: &str) -> Vec<String> {
    match host.strip_suffix(apex).and_then(|s| s.strip_suffix('.')) {
        Some(subdomain) if !subdomain.is_empty() => {
            subdomain.split('.').map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}

fn random_label() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_LABEL_LEN)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip_set(ips: &[&str]) -> HashSet<String> {
        ips.iter().map(|ip| ip.to_string()).collect()
    }

    #[test]
    fn test_wildcarded_when_orig_ip_in_probe_set() {
        // A catch-all zone answers probes with the same IP as the real host
        let orig = ip_set(&["203.0.113.9"]);
        let wildcards = ip_set(&["203.0.113.9", "203.0.113.10"]);
        assert!(is_wildcarded(&orig, &wildcards));
    }

    #[test]
    fn test_not_wildcarded_when_ips_disjoint() {
        let orig = ip_set(&["198.51.100.4"]);
        let wildcards = ip_set(&["203.0.113.9"]);
        assert!(!is_wildcarded(&orig, &wildcards));
    }

    #[test]
    fn test_not_wildcarded_when_no_probe_evidence() {
        // All probes failing yields an empty set and a negative verdict
        let orig = ip_set(&["198.51.100.4"]);
        assert!(!is_wildcarded(&orig, &HashSet::new()));
    }

    #[test]
    fn test_not_wildcarded_when_original_unresolved() {
        let wildcards = ip_set(&["203.0.113.9"]);
        assert!(!is_wildcarded(&HashSet::new(), &wildcards));
    }

    #[test]
    fn test_subdomain_tokens_depth_two() {
        assert_eq!(
            subdomain_tokens("a.b.example.com", "example.com"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_subdomain_tokens_apex_itself_is_empty() {
        assert!(subdomain_tokens("example.com", "example.com").is_empty());
    }

    #[test]
    fn test_subdomain_tokens_outside_apex_is_empty() {
        assert!(subdomain_tokens("www.other.org", "example.com").is_empty());
    }

    #[test]
    fn test_probe_hosts_one_per_depth_plus_root() {
        let probes = probe_hosts("a.b.example.com", "example.com");
        assert_eq!(probes.len(), 3);
        assert!(probes[0].ends_with(".example.com"));
        assert!(probes[1].ends_with(".a.b.example.com"));
        assert!(probes[2].ends_with(".b.example.com"));
    }

    #[test]
    fn test_probe_hosts_for_apex_only_root_probe() {
        let probes = probe_hosts("example.com", "example.com");
        assert_eq!(probes.len(), 1);
        assert!(probes[0].ends_with(".example.com"));
        // No empty labels sneak in
        assert!(!probes[0].contains(".."));
    }

    #[test]
    fn test_probe_labels_are_random_and_well_formed() {
        let a = probe_hosts("www.example.com", "example.com");
        let b = probe_hosts("www.example.com", "example.com");
        // Labels are long random strings; two rounds should never collide
        assert_ne!(a[0], b[0]);
        for probe in a.iter().chain(b.iter()) {
            assert!(!probe.contains(".."));
            let label = probe.split('.').next().unwrap();
            assert_eq!(label.len(), RANDOM_LABEL_LEN);
            assert!(label.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(!label.chars().any(|c| c.is_ascii_uppercase()));
        }
    }
}
