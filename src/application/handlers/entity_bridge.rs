//! BridgedEntity - mirrors one remote player as a host entity.
//!
//! The entity never stores the player: every read looks the player up on
//! the connection by id, so a removed player or a dropped connection is
//! reflected at the next render without any bookkeeping here.
//!
//! Attaching renders once and subscribes to the player's own updates and
//! to queue updates. Queue updates are broadcast per queue, so each one is
//! checked against the queues this player currently listens to before
//! anything is re-rendered.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, PlayerId};
use crate::domain::player::{
    entity_unique_id, player_available, DeviceInfo, EntityState, EventFilter, EventType,
    MassEvent, Player,
};
use crate::ports::{EntityStateSink, MassConnection, MassEventHandler, Subscription};

pub struct BridgedEntity {
    player_id: PlayerId,
    unique_id: String,
    connection: Arc<dyn MassConnection>,
    sink: Arc<dyn EntityStateSink>,
    attached: AtomicBool,
}

impl BridgedEntity {
    /// Creates the entity for a player the connection currently knows.
    pub fn new(
        player_id: PlayerId,
        connection: Arc<dyn MassConnection>,
        sink: Arc<dyn EntityStateSink>,
    ) -> Result<Self, DomainError> {
        if connection.player(&player_id).is_none() {
            return Err(
                DomainError::new(ErrorCode::PlayerNotFound, "Player not found on server")
                    .with_detail("player_id", player_id.to_string()),
            );
        }

        Ok(Self {
            unique_id: entity_unique_id(&player_id, None),
            player_id,
            connection,
            sink,
            attached: AtomicBool::new(false),
        })
    }

    /// Turns this into a keyed sub-entity of the player.
    pub fn with_key(mut self, key: &str) -> Self {
        self.unique_id = entity_unique_id(&self.player_id, Some(key));
        self
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Fresh snapshot of the player, if the server still has it.
    pub fn player(&self) -> Option<Player> {
        self.connection.player(&self.player_id)
    }

    pub fn available(&self) -> bool {
        player_available(self.player().as_ref(), self.connection.is_connected())
    }

    pub fn device_info(&self) -> Option<DeviceInfo> {
        let player = self.player()?;
        let provider_name = self.connection.provider_name(&player.provider);
        Some(DeviceInfo::for_player(
            &player,
            provider_name.as_deref(),
            &self.connection.server_url(),
        ))
    }

    pub fn current_state(&self) -> EntityState {
        EntityState::render(
            &self.unique_id,
            self.player().as_ref(),
            self.connection.is_connected(),
        )
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Whether `event` should trigger a re-render of this entity.
    pub fn is_relevant(&self, event: &MassEvent) -> bool {
        let Some(object_id) = event.object_id.as_deref() else {
            return !event.event.is_queue_scoped();
        };

        if !event.event.is_queue_scoped() {
            return object_id == self.player_id.as_str();
        }

        match self.player() {
            Some(player) => player.is_related_to(object_id),
            None => object_id == self.player_id.as_str(),
        }
    }

    /// Renders once and starts listening for events.
    ///
    /// The returned handle owns both subscriptions; dropping it detaches
    /// the entity.
    pub fn attach(self: Arc<Self>) -> AttachedEntity {
        self.attached.store(true, Ordering::SeqCst);
        self.render();

        let player_updates = self.connection.subscribe(
            self.clone(),
            EventFilter::scoped(EventType::PlayerUpdated, self.player_id.as_str()),
        );
        let queue_updates = self
            .connection
            .subscribe(self.clone(), EventFilter::kind(EventType::QueueUpdated));

        tracing::debug!(
            player_id = %self.player_id,
            unique_id = %self.unique_id,
            "Attached bridged entity"
        );

        AttachedEntity {
            entity: self,
            subscriptions: vec![player_updates, queue_updates],
        }
    }

    fn render(&self) {
        self.sink.write_state(self.current_state());
    }
}

#[async_trait]
impl MassEventHandler for BridgedEntity {
    async fn handle(&self, event: MassEvent) -> Result<(), DomainError> {
        // Detach may race an in-flight delivery.
        if !self.is_attached() {
            return Ok(());
        }
        if !self.is_relevant(&event) {
            tracing::trace!(
                player_id = %self.player_id,
                event = ?event.event,
                object_id = ?event.object_id,
                "Ignoring unrelated event"
            );
            return Ok(());
        }

        self.render();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "BridgedEntity"
    }
}

/// An entity with live subscriptions.
pub struct AttachedEntity {
    entity: Arc<BridgedEntity>,
    subscriptions: Vec<Subscription>,
}

impl AttachedEntity {
    pub fn entity(&self) -> &Arc<BridgedEntity> {
        &self.entity
    }

    /// Releases the subscriptions now.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for AttachedEntity {
    fn drop(&mut self) {
        self.entity.attached.store(false, Ordering::SeqCst);
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        tracing::debug!(player_id = %self.entity.player_id, "Detached bridged entity");
    }
}
