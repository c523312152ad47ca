//! In-memory FlowRegistry.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, FlowId, ServerId};
use crate::ports::{FlowRegistry, UniqueIdClaim};

#[derive(Debug, Default)]
struct Flows {
    /// Live flows in start order, with the server they were tagged with.
    live: Vec<(FlowId, Option<ServerId>)>,
    aborted: Vec<FlowId>,
    finished: Vec<FlowId>,
}

impl Flows {
    fn position(&self, flow_id: FlowId) -> Option<usize> {
        self.live.iter().position(|(id, _)| *id == flow_id)
    }
}

/// Host-side bookkeeping of setup flows for one integration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlowRegistry {
    flows: Arc<RwLock<Flows>>,
}

impl InMemoryFlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flows stopped by another flow.
    pub async fn aborted(&self) -> Vec<FlowId> {
        self.flows.read().await.aborted.clone()
    }

    /// Flows that reached a terminal step on their own.
    pub async fn finished(&self) -> Vec<FlowId> {
        self.flows.read().await.finished.clone()
    }

    /// Server a live flow is tagged with.
    pub async fn unique_id_of(&self, flow_id: FlowId) -> Option<ServerId> {
        let flows = self.flows.read().await;
        flows
            .live
            .iter()
            .find(|(id, _)| *id == flow_id)
            .and_then(|(_, server_id)| server_id.clone())
    }
}

fn flow_not_found(flow_id: FlowId) -> DomainError {
    DomainError::new(ErrorCode::FlowNotFound, "Flow not in progress")
        .with_detail("flow_id", flow_id.to_string())
}

#[async_trait]
impl FlowRegistry for InMemoryFlowRegistry {
    async fn begin(&self, flow_id: FlowId) -> Result<(), DomainError> {
        let mut flows = self.flows.write().await;
        if flows.position(flow_id).is_none() {
            flows.live.push((flow_id, None));
        }
        Ok(())
    }

    async fn set_unique_id(
        &self,
        flow_id: FlowId,
        server_id: &ServerId,
        raise_on_progress: bool,
    ) -> Result<UniqueIdClaim, DomainError> {
        let mut flows = self.flows.write().await;
        let index = flows.position(flow_id).ok_or_else(|| flow_not_found(flow_id))?;

        if raise_on_progress {
            let taken = flows
                .live
                .iter()
                .any(|(id, tag)| *id != flow_id && tag.as_ref() == Some(server_id));
            if taken {
                return Ok(UniqueIdClaim::InProgressElsewhere);
            }
        }

        flows.live[index].1 = Some(server_id.clone());
        Ok(UniqueIdClaim::Claimed)
    }

    async fn in_progress(&self) -> Result<Vec<FlowId>, DomainError> {
        Ok(self.flows.read().await.live.iter().map(|(id, _)| *id).collect())
    }

    async fn is_active(&self, flow_id: FlowId) -> Result<bool, DomainError> {
        Ok(self.flows.read().await.position(flow_id).is_some())
    }

    async fn abort(&self, flow_id: FlowId) -> Result<(), DomainError> {
        let mut flows = self.flows.write().await;
        if let Some(index) = flows.position(flow_id) {
            flows.live.remove(index);
            flows.aborted.push(flow_id);
        }
        Ok(())
    }

    async fn finish(&self, flow_id: FlowId) -> Result<(), DomainError> {
        let mut flows = self.flows.write().await;
        if let Some(index) = flows.position(flow_id) {
            flows.live.remove(index);
            flows.finished.push(flow_id);
        }
        Ok(())
    }
}
