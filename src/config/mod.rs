//! Bridge configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `MASS_BRIDGE` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use mass_bridge::config::BridgeConfig;
//!
//! let config = BridgeConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Default server: {}", config.flow.default_url);
//! ```

mod client;
mod error;
mod flow;
mod logging;

pub use client::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use flow::FlowConfig;
pub use logging::{init_tracing, LoggingConfig};

use serde::Deserialize;

/// Root bridge configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeConfig {
    /// Setup flow defaults
    #[serde(default)]
    pub flow: FlowConfig,

    /// Server client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MASS_BRIDGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MASS_BRIDGE__FLOW__DEFAULT_URL=http://10.0.0.5:8095` -> `flow.default_url`
    /// - `MASS_BRIDGE__CLIENT__REQUEST_TIMEOUT_SECS=5` -> `client.request_timeout_secs`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MASS_BRIDGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.flow.validate()?;
        self.client.validate()?;
        Ok(())
    }
}
