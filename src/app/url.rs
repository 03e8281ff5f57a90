//! Input normalization utilities.

/// Extracts the hostname from an input line.
///
/// Host lists and URL lists are both accepted: a line that parses as an
/// absolute URL with both a scheme and a host component is replaced by its
/// host; anything else is treated as a literal hostname.
pub fn extract_hostname(input: &str) -> String {
    match url::Url::parse(input) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_string(),
            None => input.to_string(),
        },
        Err(_) => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::extract_hostname;

    #[test]
    fn test_extract_hostname_from_https_url() {
        assert_eq!(
            extract_hostname("https://example.com/some/path?q=1"),
            "example.com"
        );
    }

    #[test]
    fn test_extract_hostname_from_url_with_port() {
        assert_eq!(extract_hostname("http://example.com:8080/"), "example.com");
    }

    #[test]
    fn test_bare_hostname_passes_through() {
        assert_eq!(extract_hostname("example.com"), "example.com");
        assert_eq!(extract_hostname("www.example.com"), "www.example.com");
    }

    #[test]
    fn test_ip_literal_passes_through() {
        assert_eq!(extract_hostname("1.2.3.4"), "1.2.3.4");
    }

    #[test]
    fn test_unparseable_line_treated_as_literal() {
        assert_eq!(extract_hostname("invalid..hostname"), "invalid..hostname");
        assert_eq!(extract_hostname("not a url at all"), "not a url at all");
    }

    #[test]
    fn test_scheme_without_host_treated_as_literal() {
        // "localhost:8080" parses with scheme "localhost" but no host
        assert_eq!(extract_hostname("localhost:8080"), "localhost:8080");
        assert_eq!(
            extract_hostname("mailto:user@example.com"),
            "mailto:user@example.com"
        );
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_bare_domains_are_identity(domain in "[a-z]{3,20}\\.[a-z]{2,5}") {
            prop_assert_eq!(extract_hostname(&domain), domain);
        }

        #[test]
        fn test_url_wrapping_strips_to_host(
            domain in "[a-z]{3,20}\\.[a-z]{2,5}",
            path in "[a-z]{0,20}"
        ) {
            let url = format!("https://{}/{}", domain, path);
            prop_assert_eq!(extract_hostname(&url), domain);
        }

        #[test]
        fn test_never_panics(input in ".{0,200}") {
            let _ = extract_hostname(&input);
        }
    }
}
