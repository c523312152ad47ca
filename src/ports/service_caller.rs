//! ServiceCaller port - invoke a named host service.
//!
//! Used to delegate free-text media queries to a conversation agent.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceCallError {
    #[error("Service {domain}.{service} not found")]
    NotFound { domain: String, service: String },

    #[error("Service call failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait ServiceCaller: Send + Sync {
    /// Calls `domain.service` with `data`, waiting for completion. With
    /// `return_response`, the service's structured response is returned.
    async fn call(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        return_response: bool,
    ) -> Result<Option<Value>, ServiceCallError>;
}
