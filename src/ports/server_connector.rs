//! ServerConnector port - transient connections used to read server info.
//!
//! A connector opens a session to the server at a URL; the session exposes
//! the identity the server reported and must be closed by whoever opened
//! it. The resolver in the application layer is the only caller and
//! closes the session on every path.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::server::ServerIdentity;

/// Adapter-level connect failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Network or handshake failure.
    #[error("Cannot connect: {0}")]
    CannotConnect(String),

    /// Server speaks an incompatible schema.
    #[error("Invalid server version: {0}")]
    InvalidServerVersion(String),

    /// Anything else (bad payload, client bug, ...).
    #[error("{0}")]
    Other(String),
}

/// An open connection that has completed the handshake.
#[async_trait]
pub trait ServerSession: Send {
    /// Identity reported during the handshake.
    fn server_info(&self) -> &ServerIdentity;

    /// Closes the connection.
    async fn close(self: Box<Self>);
}

#[async_trait]
pub trait ServerConnector: Send + Sync {
    /// Opens a session to the server at `url`.
    async fn connect(&self, url: &str) -> Result<Box<dyn ServerSession>, ConnectError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ServerConnector, _: Box<dyn ServerSession>) {}

    #[test]
    fn connect_error_displays_cause() {
        let err = ConnectError::CannotConnect("connection refused".into());
        assert_eq!(err.to_string(), "Cannot connect: connection refused");
    }
}
