//! EntityMatcher port - the host's generic entity targeting.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::intent::MatchConstraints;

/// An entity state as the host exposes it to matchers.
#[derive(Debug, Clone, PartialEq)]
pub struct HostState {
    pub entity_id: String,
    pub attributes: Map<String, Value>,
}

impl HostState {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// True when the attribute is present and truthy.
    pub fn has_attribute(&self, key: &str) -> bool {
        match self.attributes.get(key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pub is_match: bool,
    pub states: Vec<HostState>,
}

#[async_trait]
pub trait EntityMatcher: Send + Sync {
    async fn match_targets(&self, constraints: &MatchConstraints) -> MatchResult;
}

/// Host entity registry: maps entity ids to the unique ids integrations
/// assigned.
pub trait EntityRegistry: Send + Sync {
    fn unique_id(&self, entity_id: &str) -> Option<String>;
}
