//! In-memory entity matching and registry.
//!
//! A minimal model of the host's entity registry: entities with a name,
//! an optional area and the unique id their integration assigned.
//! Matching compares names and areas case-insensitively and restricts
//! results to the requested domains.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::intent::MatchConstraints;
use crate::ports::{EntityMatcher, EntityRegistry, HostState, MatchResult};

/// One entity known to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntity {
    pub state: HostState,
    pub name: String,
    pub area: Option<String>,
    pub unique_id: Option<String>,
}

impl HostEntity {
    pub fn new(state: HostState, name: impl Into<String>) -> Self {
        Self {
            state,
            name: name.into(),
            area: None,
            unique_id: None,
        }
    }

    pub fn in_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    fn domain(&self) -> &str {
        self.state
            .entity_id
            .split_once('.')
            .map_or("", |(domain, _)| domain)
    }

    fn matches(&self, constraints: &MatchConstraints) -> bool {
        if !constraints.domains.is_empty()
            && !constraints.domains.iter().any(|d| d == self.domain())
        {
            return false;
        }
        if let Some(name) = &constraints.name {
            if !self.name.eq_ignore_ascii_case(name.trim()) {
                return false;
            }
        }
        if let Some(area) = &constraints.area {
            match &self.area {
                Some(own) if own.eq_ignore_ascii_case(area.trim()) => {}
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityMatcher {
    entities: Arc<RwLock<Vec<HostEntity>>>,
    match_calls: Arc<AtomicUsize>,
}

impl InMemoryEntityMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(self, entity: HostEntity) -> Self {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entity);
        self
    }

    /// Times the matcher was consulted.
    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntityMatcher for InMemoryEntityMatcher {
    async fn match_targets(&self, constraints: &MatchConstraints) -> MatchResult {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        let states: Vec<HostState> = self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.matches(constraints))
            .map(|e| e.state.clone())
            .collect();

        MatchResult {
            is_match: !states.is_empty(),
            states,
        }
    }
}

impl EntityRegistry for InMemoryEntityMatcher {
    fn unique_id(&self, entity_id: &str) -> Option<String> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.state.entity_id == entity_id)
            .and_then(|e| e.unique_id.clone())
    }
}
