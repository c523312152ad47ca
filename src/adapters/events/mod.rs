//! Event bus adapters.
//!
//! - `InMemoryMassEventBus` - In-process bus delivering Music Assistant
//!   push events to subscribed handlers

mod in_memory;

pub use in_memory::InMemoryMassEventBus;
