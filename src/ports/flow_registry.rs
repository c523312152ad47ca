//! FlowRegistry port - the host's bookkeeping of in-progress setup flows.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, FlowId, ServerId};

/// Outcome of tagging a flow with the server it is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueIdClaim {
    Claimed,
    /// Another live flow is already handling this server.
    InProgressElsewhere,
}

#[async_trait]
pub trait FlowRegistry: Send + Sync {
    /// Registers a new flow as in progress.
    async fn begin(&self, flow_id: FlowId) -> Result<(), DomainError>;

    /// Tags the flow with `server_id`.
    ///
    /// With `raise_on_progress`, the tag is refused when another live flow
    /// already carries it; otherwise the tag is always applied.
    async fn set_unique_id(
        &self,
        flow_id: FlowId,
        server_id: &ServerId,
        raise_on_progress: bool,
    ) -> Result<UniqueIdClaim, DomainError>;

    /// Live flows of this integration.
    async fn in_progress(&self) -> Result<Vec<FlowId>, DomainError>;

    /// False once the flow was aborted or finished.
    async fn is_active(&self, flow_id: FlowId) -> Result<bool, DomainError>;

    /// Aborts another flow.
    async fn abort(&self, flow_id: FlowId) -> Result<(), DomainError>;

    /// Removes a flow that reached a terminal step on its own.
    async fn finish(&self, flow_id: FlowId) -> Result<(), DomainError>;
}
