//! Integration module - the stored record of one connected server.

mod record;

pub use record::{EntryState, IntegrationOptions, IntegrationRecord, NewIntegrationRecord, RecordUpdate};
