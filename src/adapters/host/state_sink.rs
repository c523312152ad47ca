//! In-memory EntityStateSink recording what the host would display.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::player::EntityState;
use crate::ports::EntityStateSink;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStateSink {
    writes: Arc<RwLock<Vec<EntityState>>>,
}

impl InMemoryStateSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state written for an entity.
    pub fn latest(&self, unique_id: &str) -> Option<EntityState> {
        self.read()
            .iter()
            .rev()
            .find(|s| s.unique_id == unique_id)
            .cloned()
    }

    /// Writes for one entity.
    pub fn write_count(&self, unique_id: &str) -> usize {
        self.read().iter().filter(|s| s.unique_id == unique_id).count()
    }

    pub fn total_writes(&self) -> usize {
        self.read().len()
    }

    /// Latest state per entity.
    pub fn snapshot(&self) -> BTreeMap<String, EntityState> {
        self.read()
            .iter()
            .map(|s| (s.unique_id.clone(), s.clone()))
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<EntityState>> {
        self.writes.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EntityStateSink for InMemoryStateSink {
    fn write_state(&self, state: EntityState) {
        self.writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state);
    }
}
