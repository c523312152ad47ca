//! Media references: what the router asks the server to play.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Artist,
    Album,
    Track,
    Playlist,
    Radio,
    Audiobook,
    Podcast,
    Folder,
    #[serde(other)]
    Unknown,
}

/// A catalog item resolved on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub item_id: String,
    pub provider: String,
    pub name: String,
    pub media_type: MediaType,
    pub uri: String,
}

/// Media handed to the playback call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlayMedia {
    /// Name or URI the server resolves itself, optionally narrowed by
    /// artist and album.
    Reference {
        media_id: String,
        media_type: Option<MediaType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        artist: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        album: Option<String>,
    },
    Item(MediaItem),
    Items(Vec<MediaItem>),
}

/// One id or a batch of ids, as an AI reply may carry either.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MediaIdRef {
    One(String),
    Many(Vec<String>),
}

/// Structured answer expected from the conversation agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AiMediaReply {
    pub media_id: MediaIdRef,
    pub media_type: MediaType,
    #[serde(default)]
    pub radio_mode: Option<bool>,
}

impl AiMediaReply {
    /// Parses the agent's speech. `None` means the speech is a plain
    /// answer for the user rather than a media instruction.
    pub fn parse(speech: &str) -> Option<Self> {
        serde_json::from_str(speech.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_id_reply() {
        let reply =
            AiMediaReply::parse(r#"{"media_id": "Bohemian Rhapsody", "media_type": "track"}"#)
                .unwrap();
        assert_eq!(reply.media_id, MediaIdRef::One("Bohemian Rhapsody".into()));
        assert_eq!(reply.media_type, MediaType::Track);
        assert_eq!(reply.radio_mode, None);
    }

    #[test]
    fn parses_batch_reply_with_radio_mode() {
        let reply = AiMediaReply::parse(
            r#" {"media_id": ["A", "B"], "media_type": "album", "radio_mode": true} "#,
        )
        .unwrap();
        assert_eq!(reply.media_id, MediaIdRef::Many(vec!["A".into(), "B".into()]));
        assert_eq!(reply.radio_mode, Some(true));
    }

    #[test]
    fn plain_text_is_not_a_reply() {
        assert_eq!(AiMediaReply::parse("Sorry, I don't know."), None);
    }

    #[test]
    fn json_without_media_fields_is_not_a_reply() {
        assert_eq!(AiMediaReply::parse(r#"{"answer": 42}"#), None);
        assert_eq!(AiMediaReply::parse("42"), None);
    }

    #[test]
    fn reference_serializes_flat() {
        let value = serde_json::to_value(PlayMedia::Reference {
            media_id: "A Night at the Opera".into(),
            media_type: Some(MediaType::Album),
            artist: Some("Queen".into()),
            album: None,
        })
        .unwrap();
        assert_eq!(value["media_id"], "A Night at the Opera");
        assert_eq!(value["media_type"], "album");
        assert_eq!(value["artist"], "Queen");
        assert!(value.get("album").is_none());
    }
}
