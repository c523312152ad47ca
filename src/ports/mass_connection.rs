//! MassConnection port - the persistent connection to a Music Assistant
//! server, as provided by the client library.
//!
//! Players are looked up by id on every read; callers never hold on to a
//! `Player` past the call that produced it.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::EventSubscriber;
use crate::domain::foundation::{EntryId, PlayerId};
use crate::domain::intent::{MediaItem, MediaType, PlayMedia};
use crate::domain::player::Player;

/// Error reported by the server; the message is shown to users as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait MassConnection: EventSubscriber {
    /// Base URL of the server this connection talks to.
    fn server_url(&self) -> String;

    /// Liveness of the underlying connection.
    fn is_connected(&self) -> bool;

    /// Current snapshot of one player.
    fn player(&self, player_id: &PlayerId) -> Option<Player>;

    fn players(&self) -> Vec<Player>;

    /// Display name of a provider instance.
    fn provider_name(&self, provider_instance: &str) -> Option<String>;

    /// Looks an item up in the server's catalog by name.
    async fn get_item_by_name(
        &self,
        name: &str,
        media_type: MediaType,
    ) -> Result<MediaItem, RemoteError>;

    /// Starts playback on the queue of `queue_id`.
    async fn play_media(
        &self,
        queue_id: &PlayerId,
        media: PlayMedia,
        radio_mode: bool,
    ) -> Result<(), RemoteError>;
}

/// Runtime lookup of the live connection belonging to a loaded record.
pub trait ConnectionLookup: Send + Sync {
    fn connection(&self, entry_id: &EntryId) -> Option<Arc<dyn MassConnection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn MassConnection, _: &dyn ConnectionLookup) {}

    #[test]
    fn remote_error_displays_message_only() {
        assert_eq!(RemoteError::new("Queue is empty").to_string(), "Queue is empty");
    }
}
