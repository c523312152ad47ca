//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the bridge and the two black boxes it sits between: the Music Assistant
//! client library and the home-automation host.
//!
//! ## Server Ports
//!
//! - `ServerConnector` / `ServerSession` - Transient connect for server info
//! - `MassConnection` - Persistent connection (players, catalog, playback)
//! - `EventSubscriber` / `MassEventHandler` - Push event subscriptions
//!
//! ## Host Ports
//!
//! - `ConfigEntryStore` - Integration record storage
//! - `FlowRegistry` - In-progress setup flows
//! - `ConnectionLookup` - Live connection of a loaded record
//! - `EntityMatcher` / `EntityRegistry` - Intent targeting
//! - `ServiceCaller` - Named service calls (conversation agents)
//! - `EntityStateSink` - Entity state writes

mod config_entry_store;
mod entity_matcher;
mod entity_state_sink;
mod event_subscriber;
mod flow_registry;
mod mass_connection;
mod server_connector;
mod service_caller;

pub use config_entry_store::ConfigEntryStore;
pub use entity_matcher::{EntityMatcher, EntityRegistry, HostState, MatchResult};
pub use entity_state_sink::EntityStateSink;
pub use event_subscriber::{EventSubscriber, MassEventHandler, Subscription};
pub use flow_registry::{FlowRegistry, UniqueIdClaim};
pub use mass_connection::{ConnectionLookup, MassConnection, RemoteError};
pub use server_connector::{ConnectError, ServerConnector, ServerSession};
pub use service_caller::{ServiceCallError, ServiceCaller};
