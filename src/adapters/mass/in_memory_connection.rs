//! In-memory MassConnection.
//!
//! Holds players, a small catalog and a record of playback calls. Changes
//! made through the helpers are pushed to subscribers like the real
//! server does, so bridged entities can be exercised end to end.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use crate::adapters::events::InMemoryMassEventBus;
use crate::domain::foundation::{DomainError, PlayerId};
use crate::domain::intent::{MediaItem, MediaType, PlayMedia};
use crate::domain::player::{EventFilter, EventType, MassEvent, Player};
use crate::ports::{EventSubscriber, MassConnection, MassEventHandler, RemoteError, Subscription};

/// A recorded `play_media` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub queue_id: PlayerId,
    pub media: PlayMedia,
    pub radio_mode: bool,
}

#[derive(Debug, Default)]
struct ServerState {
    connected: bool,
    players: BTreeMap<PlayerId, Player>,
    providers: HashMap<String, String>,
    catalog: Vec<MediaItem>,
    lookups: Vec<(String, MediaType)>,
    plays: Vec<PlayRequest>,
    play_error: Option<String>,
}

#[derive(Clone)]
pub struct InMemoryMassConnection {
    server_url: String,
    bus: InMemoryMassEventBus,
    state: Arc<RwLock<ServerState>>,
}

impl InMemoryMassConnection {
    /// A connected server without players.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            bus: InMemoryMassEventBus::new(),
            state: Arc::new(RwLock::new(ServerState {
                connected: true,
                ..Default::default()
            })),
        }
    }

    pub fn with_player(self, player: Player) -> Self {
        self.write()
            .players
            .insert(player.player_id.clone(), player);
        self
    }

    /// Registers the display name of a provider instance.
    pub fn with_provider(self, instance: &str, name: &str) -> Self {
        self.write()
            .providers
            .insert(instance.to_string(), name.to_string());
        self
    }

    pub fn with_item(self, item: MediaItem) -> Self {
        self.write().catalog.push(item);
        self
    }

    /// Makes every following `play_media` call fail with `message`.
    pub fn fail_playback(&self, message: impl Into<String>) {
        self.write().play_error = Some(message.into());
    }

    pub fn set_connected(&self, connected: bool) {
        self.write().connected = connected;
    }

    /// Stores `player` and pushes the matching player event.
    pub async fn update_player(&self, player: Player) -> Result<(), DomainError> {
        let event = {
            let mut state = self.write();
            let kind = if state.players.contains_key(&player.player_id) {
                EventType::PlayerUpdated
            } else {
                EventType::PlayerAdded
            };
            let event = MassEvent::new(kind, player.player_id.as_str());
            state.players.insert(player.player_id.clone(), player);
            event
        };
        self.bus.publish(event).await
    }

    pub async fn remove_player(&self, player_id: &PlayerId) -> Result<(), DomainError> {
        self.write().players.remove(player_id);
        self.bus
            .publish(MassEvent::new(EventType::PlayerRemoved, player_id.as_str()))
            .await
    }

    /// Pushes an arbitrary event, e.g. a queue update.
    pub async fn publish(&self, event: MassEvent) -> Result<(), DomainError> {
        self.bus.publish(event).await
    }

    pub fn bus(&self) -> &InMemoryMassEventBus {
        &self.bus
    }

    pub fn plays(&self) -> Vec<PlayRequest> {
        self.read().plays.clone()
    }

    /// Catalog lookups, in call order.
    pub fn lookups(&self) -> Vec<(String, MediaType)> {
        self.read().lookups.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ServerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ServerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSubscriber for InMemoryMassConnection {
    fn subscribe(&self, handler: Arc<dyn MassEventHandler>, filter: EventFilter) -> Subscription {
        self.bus.subscribe(handler, filter)
    }
}

#[async_trait]
impl MassConnection for InMemoryMassConnection {
    fn server_url(&self) -> String {
        self.server_url.clone()
    }

    fn is_connected(&self) -> bool {
        self.read().connected
    }

    fn player(&self, player_id: &PlayerId) -> Option<Player> {
        self.read().players.get(player_id).cloned()
    }

    fn players(&self) -> Vec<Player> {
        self.read().players.values().cloned().collect()
    }

    fn provider_name(&self, provider_instance: &str) -> Option<String> {
        self.read().providers.get(provider_instance).cloned()
    }

    async fn get_item_by_name(
        &self,
        name: &str,
        media_type: MediaType,
    ) -> Result<MediaItem, RemoteError> {
        let mut state = self.write();
        state.lookups.push((name.to_string(), media_type));
        state
            .catalog
            .iter()
            .find(|item| item.media_type == media_type && item.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| RemoteError::new(format!("No {:?} found with name {}", media_type, name)))
    }

    async fn play_media(
        &self,
        queue_id: &PlayerId,
        media: PlayMedia,
        radio_mode: bool,
    ) -> Result<(), RemoteError> {
        let mut state = self.write();
        if !state.connected {
            return Err(RemoteError::new("Not connected"));
        }
        if let Some(message) = &state.play_error {
            return Err(RemoteError::new(message.clone()));
        }
        if !state.players.contains_key(queue_id) {
            return Err(RemoteError::new(format!("Player {} is not available", queue_id)));
        }

        tracing::debug!(queue_id = %queue_id, radio_mode, "Playing media");
        state.plays.push(PlayRequest {
            queue_id: queue_id.clone(),
            media,
            radio_mode,
        });
        Ok(())
    }
}
