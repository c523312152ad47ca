//! Flow module - the connection-setup state machine vocabulary.

mod result;
mod step;

pub use result::{
    AbortReason, FieldKind, FlowResult, FormError, FormField, FormView, FIELD_AUTO_EXPOSE_PLAYERS,
    FIELD_CONVERSATION_AGENT, FIELD_URL,
};
pub use step::{FlowInput, FlowStep};

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, FlowId};

/// Failures of the flow machinery itself (not of the server being set up).
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    /// The flow was aborted or finished and no longer accepts input.
    #[error("Flow {0} is not in progress")]
    UnknownFlow(FlowId),

    #[error("Input '{input}' is not accepted in step {step:?}")]
    InvalidTransition { step: FlowStep, input: &'static str },

    #[error("Host storage error: {0}")]
    Store(DomainError),
}

impl From<DomainError> for FlowError {
    fn from(err: DomainError) -> Self {
        FlowError::Store(err)
    }
}

impl FlowError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FlowError::UnknownFlow(_) => ErrorCode::FlowNotFound,
            FlowError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            FlowError::Store(err) => err.code,
        }
    }
}
