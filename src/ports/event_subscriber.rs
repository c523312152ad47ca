//! EventSubscriber port - subscriptions to Music Assistant push events.
//!
//! Subscribing returns a [`Subscription`] handle. The handle releases the
//! registration when dropped, so a subscriber that is torn down on any
//! path (including a panic unwinding through its owner) never leaves a
//! dangling handler behind.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::player::{EventFilter, MassEvent};

/// Handler for events pushed by the server.
///
/// # Example
///
/// ```ignore
/// struct Logger;
///
/// #[async_trait]
/// impl MassEventHandler for Logger {
///     async fn handle(&self, event: MassEvent) -> Result<(), DomainError> {
///         tracing::debug!(?event.event, "event");
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "Logger"
///     }
/// }
/// ```
#[async_trait]
pub trait MassEventHandler: Send + Sync {
    async fn handle(&self, event: MassEvent) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for registering event handlers.
pub trait EventSubscriber: Send + Sync {
    /// Registers `handler` for events matching `filter`.
    fn subscribe(&self, handler: Arc<dyn MassEventHandler>, filter: EventFilter) -> Subscription;
}

type Release = Box<dyn FnOnce() + Send + Sync>;

/// Live registration with an event source. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Release>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the registration now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
