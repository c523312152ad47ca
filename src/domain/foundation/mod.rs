//! Foundation module - Shared domain primitives.
//!
//! Identifiers, error types and the state machine trait shared by the
//! server, flow, player and intent modules.

mod errors;
mod ids;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EntryId, FlowId, PlayerId, ServerId};
pub use state_machine::StateMachine;
