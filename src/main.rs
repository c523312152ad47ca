//! mass-bridge probe
//!
//! Resolves the identity of a Music Assistant server and prints it as JSON.
//!
//! ```text
//! mass-bridge [URL]
//! ```
//!
//! Without a URL the configured default (`MASS_BRIDGE__FLOW__DEFAULT_URL`)
//! is probed. Exit status is 0 on success, 1 for configuration errors and
//! 2 when the server could not be resolved.

use std::process::ExitCode;
use std::sync::Arc;

use mass_bridge::adapters::HttpServerConnector;
use mass_bridge::application::ServerInfoResolver;
use mass_bridge::config::{init_tracing, BridgeConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match BridgeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::from(1);
    }
    init_tracing(&config.logging);

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.flow.default_url.clone());

    let connector = match HttpServerConnector::new(&config.client) {
        Ok(connector) => connector,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            return ExitCode::from(1);
        }
    };
    let resolver = ServerInfoResolver::new(Arc::new(connector));

    match resolver.resolve(&url).await {
        Ok(identity) => match serde_json::to_string_pretty(&identity) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode server identity");
                ExitCode::from(2)
            }
        },
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Could not resolve server");
            eprintln!("{}: {}", url, e);
            ExitCode::from(2)
        }
    }
}
