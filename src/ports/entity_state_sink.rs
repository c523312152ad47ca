//! EntityStateSink port - where rendered entity state is written.

use crate::domain::player::EntityState;

/// Host state machine writes. Writing is synchronous on the host loop.
pub trait EntityStateSink: Send + Sync {
    fn write_state(&self, state: EntityState);
}
