//! In-memory ConfigEntryStore.
//!
//! Stands in for the host's config-entry storage in tests and in the probe
//! binary. Records keep creation order; reloads are counted per record so
//! tests can assert "exactly one reload".

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EntryId, ErrorCode, ServerId};
use crate::domain::integration::{
    EntryState, IntegrationRecord, NewIntegrationRecord, RecordUpdate,
};
use crate::ports::ConfigEntryStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigEntryStore {
    records: Arc<RwLock<Vec<IntegrationRecord>>>,
    reloads: Arc<RwLock<HashMap<EntryId, usize>>>,
}

impl InMemoryConfigEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the uniqueness check.
    pub async fn insert(&self, record: IntegrationRecord) {
        self.records.write().await.push(record);
    }

    /// Sets the lifecycle state the host reports for a record.
    pub async fn set_state(&self, entry_id: &EntryId, state: EntryState) {
        let mut records = self.records.write().await;
        if let Some(record) = records.iter_mut().find(|r| r.entry_id == *entry_id) {
            record.state = state;
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of reloads requested for one record.
    pub async fn reload_count(&self, entry_id: &EntryId) -> usize {
        self.reloads
            .read()
            .await
            .get(entry_id)
            .copied()
            .unwrap_or(0)
    }

    /// Reloads requested across all records.
    pub async fn total_reloads(&self) -> usize {
        self.reloads.read().await.values().sum()
    }
}

fn entry_not_found(entry_id: &EntryId) -> DomainError {
    DomainError::new(ErrorCode::EntryNotFound, "Config entry not found")
        .with_detail("entry_id", entry_id.to_string())
}

#[async_trait]
impl ConfigEntryStore for InMemoryConfigEntryStore {
    async fn entries(&self) -> Result<Vec<IntegrationRecord>, DomainError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_unique_id(
        &self,
        server_id: &ServerId,
    ) -> Result<Option<IntegrationRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.unique_id == *server_id).cloned())
    }

    async fn get(&self, entry_id: &EntryId) -> Result<Option<IntegrationRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.entry_id == *entry_id).cloned())
    }

    async fn create(&self, record: NewIntegrationRecord) -> Result<IntegrationRecord, DomainError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.unique_id == record.unique_id) {
            return Err(
                DomainError::new(ErrorCode::AlreadyConfigured, "Server already configured")
                    .with_detail("unique_id", record.unique_id.to_string()),
            );
        }

        let record = record.into_record();
        records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        entry_id: &EntryId,
        update: RecordUpdate,
    ) -> Result<IntegrationRecord, DomainError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.entry_id == *entry_id)
            .ok_or_else(|| entry_not_found(entry_id))?;

        record.apply(&update);
        Ok(record.clone())
    }

    async fn reload(&self, entry_id: &EntryId) -> Result<(), DomainError> {
        {
            let mut records = self.records.write().await;
            let record = records
                .iter_mut()
                .find(|r| r.entry_id == *entry_id)
                .ok_or_else(|| entry_not_found(entry_id))?;
            record.state = EntryState::Loaded;
        }

        *self.reloads.write().await.entry(*entry_id).or_default() += 1;
        Ok(())
    }
}
