//! In-process stand-ins for the host platform.
//!
//! - `InMemoryConfigEntryStore` / `InMemoryFlowRegistry` - Record and flow storage
//! - `InMemoryConnectionLookup` - Live connections of loaded records
//! - `InMemoryEntityMatcher` - Entity targeting and registry
//! - `MockServiceCaller` - Scripted service calls
//! - `InMemoryStateSink` - Recorded entity state writes

mod config_entry_store;
mod connection_lookup;
mod entity_matcher;
mod flow_registry;
mod service_caller;
mod state_sink;

pub use config_entry_store::InMemoryConfigEntryStore;
pub use connection_lookup::InMemoryConnectionLookup;
pub use entity_matcher::{HostEntity, InMemoryEntityMatcher};
pub use flow_registry::InMemoryFlowRegistry;
pub use service_caller::{MockServiceCaller, ServiceCall};
pub use state_sink::InMemoryStateSink;
