//! Mock ServerConnector for testing.
//!
//! Answers connects from a table of URLs, so flows can be driven without a
//! running Music Assistant server.
//!
//! # Features
//!
//! - Per-URL identities or connect failures
//! - Simulated latency for interleaving concurrent flows
//! - Call and close tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let connector = MockServerConnector::new()
//!     .with_server("http://h1:8095", "1234")
//!     .with_failure("http://old:8095", ConnectError::InvalidServerVersion("20".into()));
//!
//! let session = connector.connect("http://h1:8095").await?;
//! assert_eq!(session.server_info().server_id.as_str(), "1234");
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ServerId;
use crate::domain::server::ServerIdentity;
use crate::ports::{ConnectError, ServerConnector, ServerSession};

type Answer = Result<ServerIdentity, ConnectError>;

#[derive(Debug, Clone, Default)]
pub struct MockServerConnector {
    servers: Arc<Mutex<HashMap<String, Answer>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicUsize>,
}

impl MockServerConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves a default identity for `server_id` at `url`.
    pub fn with_server(self, url: &str, server_id: &str) -> Self {
        let answer = match ServerId::new(server_id) {
            Ok(id) => Ok(identity(id, url)),
            Err(err) => Err(ConnectError::Other(err.to_string())),
        };
        self.set_answer(url, answer);
        self
    }

    pub fn with_identity(self, url: &str, identity: ServerIdentity) -> Self {
        self.set_answer(url, Ok(identity));
        self
    }

    pub fn with_failure(self, url: &str, err: ConnectError) -> Self {
        self.set_answer(url, Err(err));
        self
    }

    /// Adds latency to every connect.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Takes a server offline; later connects fail with `CannotConnect`.
    pub fn remove_server(&self, url: &str) {
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);
    }

    /// URLs connected to, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn connect_count(&self) -> usize {
        self.calls().len()
    }

    /// Sessions closed so far.
    pub fn closed_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn set_answer(&self, url: &str, answer: Answer) {
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), answer);
    }
}

fn identity(server_id: ServerId, url: &str) -> ServerIdentity {
    ServerIdentity {
        server_id,
        base_url: url.to_string(),
        server_version: "2.3.0".to_string(),
        schema_version: 25,
        min_supported_schema_version: 23,
        homeassistant_addon: false,
    }
}

struct MockSession {
    identity: ServerIdentity,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl ServerSession for MockSession {
    fn server_info(&self) -> &ServerIdentity {
        &self.identity
    }

    async fn close(self: Box<Self>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ServerConnector for MockServerConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn ServerSession>, ConnectError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let answer = self
            .servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned();

        match answer {
            Some(Ok(identity)) => Ok(Box::new(MockSession {
                identity,
                closed: self.closed.clone(),
            })),
            Some(Err(err)) => Err(err),
            None => Err(ConnectError::CannotConnect(format!(
                "Cannot connect to {}",
                url
            ))),
        }
    }
}
