//! ServerInfoResolver - reads a server's identity over a transient connection.

use std::sync::Arc;

use crate::domain::server::{ResolveError, ServerIdentity};
use crate::ports::{ConnectError, ServerConnector};

/// Resolves a URL to the identity of the server behind it.
pub struct ServerInfoResolver {
    connector: Arc<dyn ServerConnector>,
}

impl ServerInfoResolver {
    pub fn new(connector: Arc<dyn ServerConnector>) -> Self {
        Self { connector }
    }

    /// Connects to `url`, reads the identity and closes the connection.
    ///
    /// Every failure is classified; anything that is neither a connection
    /// nor a version problem is logged and reported as `Unknown`.
    pub async fn resolve(&self, url: &str) -> Result<ServerIdentity, ResolveError> {
        let session = match self.connector.connect(url).await {
            Ok(session) => session,
            Err(ConnectError::CannotConnect(reason)) => {
                tracing::debug!(url, %reason, "Server unreachable");
                return Err(ResolveError::CannotConnect(reason));
            }
            Err(ConnectError::InvalidServerVersion(reason)) => {
                tracing::debug!(url, %reason, "Server version rejected");
                return Err(ResolveError::InvalidServerVersion(reason));
            }
            Err(ConnectError::Other(reason)) => {
                tracing::error!(url, %reason, "Unexpected error reading server info");
                return Err(ResolveError::Unknown(reason));
            }
        };

        let identity = session.server_info().clone();
        session.close().await;

        tracing::debug!(
            url,
            server_id = %identity.server_id,
            server_version = %identity.server_version,
            "Resolved server info"
        );
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mass::MockServerConnector;

    #[tokio::test]
    async fn resolves_identity_and_closes_session() {
        let connector = Arc::new(MockServerConnector::new().with_server("http://h1:8095", "1234"));
        let resolver = ServerInfoResolver::new(connector.clone());

        let identity = resolver.resolve("http://h1:8095").await.unwrap();

        assert_eq!(identity.server_id.as_str(), "1234");
        assert_eq!(connector.closed_count(), 1);
    }

    #[tokio::test]
    async fn unreachable_server_is_cannot_connect() {
        let connector = Arc::new(MockServerConnector::new());
        let resolver = ServerInfoResolver::new(connector.clone());

        let result = resolver.resolve("http://nowhere:8095").await;

        assert!(matches!(result, Err(ResolveError::CannotConnect(_))));
        assert_eq!(connector.closed_count(), 0);
    }

    #[tokio::test]
    async fn version_mismatch_is_invalid_server_version() {
        let connector = MockServerConnector::new().with_failure(
            "http://old:8095",
            ConnectError::InvalidServerVersion("schema 20".into()),
        );
        let resolver = ServerInfoResolver::new(Arc::new(connector));

        let result = resolver.resolve("http://old:8095").await;
        assert_eq!(
            result,
            Err(ResolveError::InvalidServerVersion("schema 20".into()))
        );
    }

    #[tokio::test]
    async fn other_failures_are_normalised_to_unknown() {
        let connector = MockServerConnector::new()
            .with_failure("http://weird:8095", ConnectError::Other("bad payload".into()));
        let resolver = ServerInfoResolver::new(Arc::new(connector));

        let result = resolver.resolve("http://weird:8095").await;
        assert_eq!(result, Err(ResolveError::Unknown("bad payload".into())));
    }
}
