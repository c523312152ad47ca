//! Server client configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How the bridge talks to Music Assistant servers
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Timeout for a server info request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// API schema version the bridge speaks
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Oldest server schema version the bridge accepts
    #[serde(default = "default_min_schema_version")]
    pub min_schema_version: u32,
}

impl ClientConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate client configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.min_schema_version > self.schema_version {
            return Err(ValidationError::InvalidSchemaRange);
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            schema_version: default_schema_version(),
            min_schema_version: default_min_schema_version(),
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}

fn default_schema_version() -> u32 {
    25
}

fn default_min_schema_version() -> u32 {
    23
}
