//! Server module - identity of a Music Assistant server and the ways we
//! learn about it (manual connect or zeroconf announcement).

mod discovery;
mod identity;

pub use discovery::DiscoveryInfo;
pub use identity::ServerIdentity;

use thiserror::Error;

/// True for an absolute `http`/`https` URL with a non-empty host.
pub fn is_server_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(rest) => rest
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|authority| !authority.is_empty() && !authority.starts_with(':')),
        None => false,
    }
}

/// Classified failure of a server info lookup.
///
/// Callers never see an unclassified failure: anything that is not a
/// connection or version problem is reported as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Cannot connect to server: {0}")]
    CannotConnect(String),

    #[error("Incompatible server version: {0}")]
    InvalidServerVersion(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

/// Reasons a discovery announcement is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("Discovery payload has no server_id")]
    MissingServerId,

    #[error("Discovery payload has no base_url")]
    MissingBaseUrl,

    #[error("Discovery property '{0}' has an invalid value")]
    InvalidProperty(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_urls() {
        assert!(is_server_url("http://mass.local:8095"));
        assert!(is_server_url("https://mass.example.com/"));
    }

    #[test]
    fn rejects_other_schemes_and_missing_hosts() {
        assert!(!is_server_url("ws://mass.local:8095"));
        assert!(!is_server_url("mass.local:8095"));
        assert!(!is_server_url("http://"));
        assert!(!is_server_url("http://:8095"));
        assert!(!is_server_url(""));
    }
}
