//! In-memory ConnectionLookup: the live connection of each loaded record.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::foundation::EntryId;
use crate::ports::{ConnectionLookup, MassConnection};

#[derive(Clone, Default)]
pub struct InMemoryConnectionLookup {
    connections: Arc<RwLock<HashMap<EntryId, Arc<dyn MassConnection>>>>,
}

impl InMemoryConnectionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry_id: EntryId, connection: Arc<dyn MassConnection>) {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entry_id, connection);
    }

    pub fn remove(&self, entry_id: &EntryId) {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(entry_id);
    }
}

impl ConnectionLookup for InMemoryConnectionLookup {
    fn connection(&self, entry_id: &EntryId) -> Option<Arc<dyn MassConnection>> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(entry_id)
            .cloned()
    }
}
