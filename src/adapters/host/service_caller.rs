//! Scripted ServiceCaller.
//!
//! Answers service calls from a queue of prepared responses and records
//! every call, standing in for the host's conversation agents.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::{ServiceCallError, ServiceCaller};

/// A recorded service call.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: Value,
}

#[derive(Debug, Clone, Default)]
pub struct MockServiceCaller {
    responses: Arc<Mutex<VecDeque<Result<Value, ServiceCallError>>>>,
    calls: Arc<Mutex<Vec<ServiceCall>>>,
}

impl MockServiceCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw service response.
    pub fn with_response(self, response: Value) -> Self {
        self.push(Ok(response));
        self
    }

    /// Queues a conversation agent reply whose speech is `speech`.
    pub fn with_speech(self, speech: impl Into<String>) -> Self {
        let speech: String = speech.into();
        self.with_response(json!({
            "response": {
                "response_type": "action_done",
                "speech": { "plain": { "speech": speech } }
            }
        }))
    }

    pub fn with_error(self, err: ServiceCallError) -> Self {
        self.push(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, response: Result<Value, ServiceCallError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }
}

#[async_trait]
impl ServiceCaller for MockServiceCaller {
    async fn call(
        &self,
        domain: &str,
        service: &str,
        data: Value,
        return_response: bool,
    ) -> Result<Option<Value>, ServiceCallError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ServiceCall {
                domain: domain.to_string(),
                service: service.to_string(),
                data,
            });

        let next = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(value)) => Ok(return_response.then_some(value)),
            Some(Err(err)) => Err(err),
            None => Err(ServiceCallError::NotFound {
                domain: domain.to_string(),
                service: service.to_string(),
            }),
        }
    }
}
