//! Backend endpoint normalization
//!
//! The operator configures a bare host string; whether the client talks
//! plaintext or TLS is decided from the host itself. The base URL is
//! recomputed from the raw string on every request, so configuration
//! changes take effect immediately.

use thiserror::Error;

/// Host fragments that mark a local/private deployment
///
/// Matching hosts are LAN appliances that never carry certificates, so
/// they must not be upgraded to https.
const PRIVATE_MARKERS: [&str; 4] = ["192.168", "block", "local", "127.0.0.1"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// No backend host configured
    #[error("backend host not configured")]
    Missing,
}

/// Normalize a raw host string into a base URL.
///
/// Private hosts keep (or get) `http://`; every other host is forced to
/// `https://`, upgrading an existing `http://`. A trailing slash is
/// stripped.
pub fn normalize(raw: &str) -> Result<String, EndpointError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EndpointError::Missing);
    }

    let mut base = raw.to_string();
    if PRIVATE_MARKERS.iter().any(|marker| base.contains(marker)) {
        if !base.starts_with("http") {
            base = format!("http://{base}");
        }
    } else {
        if !base.starts_with("https") {
            base = base.replace("http", "https");
        }
        if !base.starts_with("https") {
            base = format!("https://{base}");
        }
    }

    if base.ends_with('/') {
        base.pop();
    }

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_host_gets_plain_http() {
        assert_eq!(normalize("192.168.1.5").unwrap(), "http://192.168.1.5");
        assert_eq!(
            normalize("127.0.0.1:8000").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize("localhost:8000").unwrap(),
            "http://localhost:8000"
        );
    }

    #[test]
    fn private_host_scheme_is_preserved() {
        assert_eq!(
            normalize("http://192.168.1.5").unwrap(),
            "http://192.168.1.5"
        );
        assert_eq!(
            normalize("https://intranet.local").unwrap(),
            "https://intranet.local"
        );
    }

    #[test]
    fn public_host_is_forced_to_https() {
        assert_eq!(
            normalize("shop.example.com").unwrap(),
            "https://shop.example.com"
        );
        assert_eq!(
            normalize("http://shop.example.com").unwrap(),
            "https://shop.example.com"
        );
        assert_eq!(
            normalize("https://shop.example.com").unwrap(),
            "https://shop.example.com"
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(
            normalize("https://shop.example.com/").unwrap(),
            "https://shop.example.com"
        );
        assert_eq!(normalize("192.168.0.2/").unwrap(), "http://192.168.0.2");
    }

    #[test]
    fn empty_host_is_a_configuration_error() {
        assert_eq!(normalize(""), Err(EndpointError::Missing));
        assert_eq!(normalize("   "), Err(EndpointError::Missing));
    }
}
