//! HTTP ServerConnector.
//!
//! Reads the server info document a Music Assistant server serves at
//! `GET {base_url}/info` and checks that the server speaks a schema this
//! bridge understands.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::domain::server::{ResolveError, ServerIdentity};
use crate::ports::{ConnectError, ServerConnector, ServerSession};

/// Connector speaking plain HTTP to the server's info endpoint.
#[derive(Debug, Clone)]
pub struct HttpServerConnector {
    client: Client,
    timeout: Duration,
    schema_version: u32,
    min_schema_version: u32,
}

impl HttpServerConnector {
    /// Creates a connector from client configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConnectError::Other` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConnectError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConnectError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.request_timeout(),
            schema_version: config.schema_version,
            min_schema_version: config.min_schema_version,
        })
    }

    fn info_url(base_url: &str) -> String {
        format!("{}/info", base_url.trim_end_matches('/'))
    }

    fn map_send_error(&self, e: reqwest::Error) -> ConnectError {
        if e.is_timeout() {
            ConnectError::CannotConnect(format!(
                "Timed out after {}s",
                self.timeout.as_secs()
            ))
        } else if e.is_connect() {
            ConnectError::CannotConnect(format!("Connection failed: {}", e))
        } else if e.is_builder() {
            ConnectError::CannotConnect(format!("Invalid URL: {}", e))
        } else {
            ConnectError::CannotConnect(e.to_string())
        }
    }
}

/// Session over stateless HTTP; closing only marks the end of the exchange.
struct HttpSession {
    identity: ServerIdentity,
}

#[async_trait]
impl ServerSession for HttpSession {
    fn server_info(&self) -> &ServerIdentity {
        &self.identity
    }

    async fn close(self: Box<Self>) {
        tracing::trace!(server_id = %self.identity.server_id, "Closed server info session");
    }
}

#[async_trait]
impl ServerConnector for HttpServerConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn ServerSession>, ConnectError> {
        let response = self
            .client
            .get(Self::info_url(url))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND => ConnectError::CannotConnect(format!(
                    "{} does not look like a Music Assistant server",
                    url
                )),
                _ => ConnectError::CannotConnect(format!("Unexpected status {}", status)),
            });
        }

        let identity: ServerIdentity = response
            .json()
            .await
            .map_err(|e| ConnectError::Other(format!("Invalid server info: {}", e)))?;

        identity
            .check_compatible(self.schema_version, self.min_schema_version)
            .map_err(|e| match e {
                ResolveError::InvalidServerVersion(reason) => {
                    ConnectError::InvalidServerVersion(reason)
                }
                other => ConnectError::Other(other.to_string()),
            })?;

        Ok(Box::new(HttpSession { identity }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_url_ignores_trailing_slash() {
        assert_eq!(
            HttpServerConnector::info_url("http://h1:8095/"),
            "http://h1:8095/info"
        );
        assert_eq!(
            HttpServerConnector::info_url("http://h1:8095"),
            "http://h1:8095/info"
        );
    }

    #[tokio::test]
    async fn unreachable_host_cannot_connect() {
        let config = ClientConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        let connector = HttpServerConnector::new(&config).unwrap();

        // Port 9 (discard) on localhost is closed on test machines.
        let result = connector.connect("http://127.0.0.1:9").await;

        assert!(matches!(result, Err(ConnectError::CannotConnect(_))));
    }

    #[tokio::test]
    async fn malformed_url_cannot_connect() {
        let connector = HttpServerConnector::new(&ClientConfig::default()).unwrap();
        let result = connector.connect("not a url").await;
        assert!(matches!(result, Err(ConnectError::CannotConnect(_))));
    }
}
