//! In-memory event bus for Music Assistant push events.
//!
//! Delivers events to subscribed handlers in subscription order, awaiting
//! each handler in turn. Used by the in-memory connection and in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::player::{EventFilter, MassEvent};
use crate::ports::{EventSubscriber, MassEventHandler, Subscription};

/// Most recent events kept for inspection; older ones are dropped.
pub const RECORDED_EVENT_LIMIT: usize = 256;

struct Registration {
    id: u64,
    filter: EventFilter,
    handler: Arc<dyn MassEventHandler>,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    handlers: RwLock<Vec<Registration>>,
    published: RwLock<VecDeque<MassEvent>>,
}

impl Registry {
    fn remove(&self, id: u64) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|r| r.id != id);
    }
}

/// In-memory event bus.
///
/// # Example
///
/// ```ignore
/// let bus = InMemoryMassEventBus::new();
/// let subscription = bus.subscribe(handler, EventFilter::kind(EventType::QueueUpdated));
///
/// bus.publish(MassEvent::new(EventType::QueueUpdated, "kitchen")).await?;
/// assert_eq!(bus.event_count(), 1);
///
/// drop(subscription);
/// assert_eq!(bus.handler_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryMassEventBus {
    registry: Arc<Registry>,
}

impl InMemoryMassEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every matching handler.
    ///
    /// Handlers are snapshotted before delivery, so a handler that
    /// unsubscribes during delivery still sees the current event but no
    /// later ones. All handlers run even if one fails; failures are
    /// reported together.
    pub async fn publish(&self, event: MassEvent) -> Result<(), DomainError> {
        {
            let mut published = self
                .registry
                .published
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if published.len() == RECORDED_EVENT_LIMIT {
                published.pop_front();
            }
            published.push_back(event.clone());
        }

        // Clone handlers to release the lock before await points
        let targets: Vec<Arc<dyn MassEventHandler>> = {
            let handlers = self
                .registry
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            handlers
                .iter()
                .filter(|r| r.filter.matches(&event))
                .map(|r| r.handler.clone())
                .collect()
        };

        let mut errors = Vec::new();
        for handler in targets {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::warn!(handler = handler.name(), error = %e, "Event handler failed");
                errors.push(format!("{}: {}", handler.name(), e));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }

    // === Test Helpers ===

    /// Live registrations.
    pub fn handler_count(&self) -> usize {
        self.registry
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The last [`RECORDED_EVENT_LIMIT`] events, oldest first.
    pub fn published_events(&self) -> Vec<MassEvent> {
        self.registry
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.registry
            .published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl EventSubscriber for InMemoryMassEventBus {
    fn subscribe(&self, handler: Arc<dyn MassEventHandler>, filter: EventFilter) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(handler = handler.name(), id, ?filter, "Subscribed");

        self.registry
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                id,
                filter,
                handler,
            });

        let registry: Weak<Registry> = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.remove(id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::EventType;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<MassEvent>>,
        fail: bool,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn count(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MassEventHandler for Recorder {
        async fn handle(&self, event: MassEvent) -> Result<(), DomainError> {
            self.seen.lock().unwrap().push(event);
            if self.fail {
                return Err(DomainError::new(ErrorCode::InternalError, "boom"));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "Recorder"
        }
    }

    #[tokio::test]
    async fn delivers_only_matching_events() {
        let bus = InMemoryMassEventBus::new();
        let recorder = Recorder::new();
        let _sub = bus.subscribe(
            recorder.clone(),
            EventFilter::scoped(EventType::PlayerUpdated, "kitchen"),
        );

        bus.publish(MassEvent::new(EventType::PlayerUpdated, "kitchen"))
            .await
            .unwrap();
        bus.publish(MassEvent::new(EventType::PlayerUpdated, "bedroom"))
            .await
            .unwrap();

        assert_eq!(recorder.count(), 1);
        assert_eq!(bus.event_count(), 2);
    }

    #[tokio::test]
    async fn dropped_subscription_stops_delivery() {
        let bus = InMemoryMassEventBus::new();
        let recorder = Recorder::new();
        let sub = bus.subscribe(recorder.clone(), EventFilter::default());
        assert_eq!(bus.handler_count(), 1);

        drop(sub);
        bus.publish(MassEvent::new(EventType::QueueUpdated, "kitchen"))
            .await
            .unwrap();

        assert_eq!(bus.handler_count(), 0);
        assert_eq!(recorder.count(), 0);
    }

    #[tokio::test]
    async fn failing_handler_does_not_starve_others() {
        let bus = InMemoryMassEventBus::new();
        let failing = Recorder::failing();
        let healthy = Recorder::new();
        let _a = bus.subscribe(failing.clone(), EventFilter::default());
        let _b = bus.subscribe(healthy.clone(), EventFilter::default());

        let result = bus
            .publish(MassEvent::new(EventType::PlayerAdded, "kitchen"))
            .await;

        assert!(result.is_err());
        assert_eq!(healthy.count(), 1);
    }

    #[tokio::test]
    async fn recorded_events_are_capped() {
        let bus = InMemoryMassEventBus::new();

        for n in 0..RECORDED_EVENT_LIMIT + 10 {
            bus.publish(MassEvent::new(EventType::QueueTimeUpdated, format!("q{}", n)))
                .await
                .unwrap();
        }

        let events = bus.published_events();
        assert_eq!(events.len(), RECORDED_EVENT_LIMIT);
        assert_eq!(events[0].object_id.as_deref(), Some("q10"));
        assert_eq!(bus.event_count(), RECORDED_EVENT_LIMIT);
    }

    #[test]
    fn subscription_outliving_bus_is_harmless() {
        let bus = InMemoryMassEventBus::new();
        let sub = bus.subscribe(Recorder::new(), EventFilter::default());
        drop(bus);
        drop(sub);
    }
}
