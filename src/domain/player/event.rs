//! Push events from the Music Assistant server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PlayerAdded,
    PlayerUpdated,
    PlayerRemoved,
    QueueAdded,
    QueueUpdated,
    QueueItemsUpdated,
    QueueTimeUpdated,
    #[serde(other)]
    Other,
}

impl EventType {
    /// Events scoped to a queue rather than a single player.
    pub fn is_queue_scoped(&self) -> bool {
        matches!(
            self,
            EventType::QueueAdded
                | EventType::QueueUpdated
                | EventType::QueueItemsUpdated
                | EventType::QueueTimeUpdated
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassEvent {
    pub event: EventType,
    /// Player or queue the event is about.
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl MassEvent {
    pub fn new(event: EventType, object_id: impl Into<String>) -> Self {
        Self {
            event,
            object_id: Some(object_id.into()),
            data: Value::Null,
        }
    }
}

/// Which events a subscription receives. `None` means any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub event: Option<EventType>,
    pub object_id: Option<String>,
}

impl EventFilter {
    pub fn kind(event: EventType) -> Self {
        Self {
            event: Some(event),
            object_id: None,
        }
    }

    pub fn scoped(event: EventType, object_id: impl Into<String>) -> Self {
        Self {
            event: Some(event),
            object_id: Some(object_id.into()),
        }
    }

    pub fn matches(&self, event: &MassEvent) -> bool {
        if self.event.is_some_and(|kind| kind != event.event) {
            return false;
        }
        match &self.object_id {
            Some(id) => event.object_id.as_deref() == Some(id.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_filter_requires_matching_object() {
        let filter = EventFilter::scoped(EventType::PlayerUpdated, "p1");
        assert!(filter.matches(&MassEvent::new(EventType::PlayerUpdated, "p1")));
        assert!(!filter.matches(&MassEvent::new(EventType::PlayerUpdated, "p2")));
        assert!(!filter.matches(&MassEvent::new(EventType::QueueUpdated, "p1")));
    }

    #[test]
    fn kind_filter_accepts_any_object() {
        let filter = EventFilter::kind(EventType::QueueUpdated);
        assert!(filter.matches(&MassEvent::new(EventType::QueueUpdated, "anything")));
    }

    #[test]
    fn queue_events_are_queue_scoped() {
        assert!(EventType::QueueUpdated.is_queue_scoped());
        assert!(!EventType::PlayerUpdated.is_queue_scoped());
    }
}
