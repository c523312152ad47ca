//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the bridge to the systems around it:
//! - `events` - In-process event bus for server push events
//! - `host` - In-process stand-ins for the home-automation host
//! - `mass` - Music Assistant server connectors and connections

pub mod events;
pub mod host;
pub mod mass;

pub use events::InMemoryMassEventBus;
pub use host::{
    HostEntity, InMemoryConfigEntryStore, InMemoryConnectionLookup, InMemoryEntityMatcher,
    InMemoryFlowRegistry, InMemoryStateSink, MockServiceCaller, ServiceCall,
};
pub use mass::{HttpServerConnector, InMemoryMassConnection, MockServerConnector, PlayRequest};
