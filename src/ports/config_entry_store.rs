//! ConfigEntryStore port - the host's storage of integration records.
//!
//! The host owns the records. The bridge only reads them and requests
//! mutations through this port, and must tolerate the host changing them
//! concurrently (a reload triggered by the user, for example).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EntryId, ServerId};
use crate::domain::integration::{IntegrationRecord, NewIntegrationRecord, RecordUpdate};

#[async_trait]
pub trait ConfigEntryStore: Send + Sync {
    /// All records of this integration, in creation order.
    async fn entries(&self) -> Result<Vec<IntegrationRecord>, DomainError>;

    /// Record keyed by `server_id`, if any.
    async fn find_by_unique_id(
        &self,
        server_id: &ServerId,
    ) -> Result<Option<IntegrationRecord>, DomainError>;

    async fn get(&self, entry_id: &EntryId) -> Result<Option<IntegrationRecord>, DomainError>;

    /// Creates a record.
    ///
    /// # Errors
    ///
    /// - `AlreadyConfigured` if a record with the same unique id exists
    async fn create(&self, record: NewIntegrationRecord) -> Result<IntegrationRecord, DomainError>;

    /// Updates a record in place.
    ///
    /// # Errors
    ///
    /// - `EntryNotFound` if the record is gone
    async fn update(
        &self,
        entry_id: &EntryId,
        update: RecordUpdate,
    ) -> Result<IntegrationRecord, DomainError>;

    /// Asks the host to tear down and set up the record again.
    async fn reload(&self, entry_id: &EntryId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn ConfigEntryStore) {}
}
