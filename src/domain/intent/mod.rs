//! Intent module - voice/text intents that start playback.

mod media;
mod slots;

pub use media::{AiMediaReply, MediaIdRef, MediaItem, MediaType, PlayMedia};
pub use slots::{
    Intent, IntentSlots, IntentType, MatchConstraints, ALBUM_SLOT, AREA_SLOT, ARTIST_SLOT,
    MEDIA_PLAYER_DOMAIN, MEDIA_SLOTS, NAME_SLOT, PLAYLIST_SLOT, QUERY_SLOT, RADIO_MODE_SLOT,
    RADIO_SLOT, TRACK_SLOT,
};

use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentResponseType {
    ActionDone,
    /// The agent answered in prose; nothing was played.
    PartialActionDone,
}

/// What the user hears back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentResponse {
    pub response_type: IntentResponseType,
    pub speech: String,
}

impl IntentResponse {
    pub fn done() -> Self {
        Self {
            response_type: IntentResponseType::ActionDone,
            speech: "Okay".to_string(),
        }
    }

    pub fn partial(speech: impl Into<String>) -> Self {
        Self {
            response_type: IntentResponseType::PartialActionDone,
            speech: speech.into(),
        }
    }
}

/// Intent failures; the message is what the user is told.
#[derive(Debug, Clone, Error)]
pub enum IntentError {
    #[error("Music Assistant not loaded")]
    NotLoaded,

    #[error("Service handler cannot target all devices")]
    CannotTargetAll,

    #[error("No entities matched for: name={name:?}, area_name={area:?}")]
    NoTargetMatched {
        name: Option<String>,
        area: Option<String>,
    },

    #[error("No Music Assistant player matched: name={name:?}, area_name={area:?}")]
    MatchFailed {
        name: Option<String>,
        area: Option<String>,
    },

    #[error("query requires using a conversation agent {docs_url}")]
    AgentNotConfigured { docs_url: String },

    #[error("No media item found")]
    NoMediaItem,

    #[error("Conversation agent failed: {0}")]
    Conversation(String),

    /// Failure reported by the server, passed through verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("{0}")]
    Host(DomainError),
}

impl From<DomainError> for IntentError {
    fn from(err: DomainError) -> Self {
        IntentError::Host(err)
    }
}
