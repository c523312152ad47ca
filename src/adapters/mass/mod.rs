//! Music Assistant server adapters.
//!
//! - `HttpServerConnector` - Reads server info over HTTP
//! - `MockServerConnector` - Table-driven connector for tests
//! - `InMemoryMassConnection` - In-process server with players and catalog

mod http_connector;
mod in_memory_connection;
mod mock_connector;

pub use http_connector::HttpServerConnector;
pub use in_memory_connection::{InMemoryMassConnection, PlayRequest};
pub use mock_connector::MockServerConnector;
