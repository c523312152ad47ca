//! Intents and their slot values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::media::{MediaType, PlayMedia};

pub const NAME_SLOT: &str = "name";
pub const AREA_SLOT: &str = "area";
pub const QUERY_SLOT: &str = "query";
pub const ARTIST_SLOT: &str = "artist";
pub const TRACK_SLOT: &str = "track";
pub const ALBUM_SLOT: &str = "album";
pub const RADIO_SLOT: &str = "radio";
pub const PLAYLIST_SLOT: &str = "playlist";
pub const RADIO_MODE_SLOT: &str = "radio_mode";

/// Slots that name the media to play, in lookup order, with the kind of
/// media each one names.
pub const MEDIA_SLOTS: [(&str, MediaType); 5] = [
    (TRACK_SLOT, MediaType::Track),
    (ALBUM_SLOT, MediaType::Album),
    (ARTIST_SLOT, MediaType::Artist),
    (PLAYLIST_SLOT, MediaType::Playlist),
    (RADIO_SLOT, MediaType::Radio),
];

/// The name value that means "every device" and therefore no name.
const ALL_TARGETS: &str = "all";

pub const MEDIA_PLAYER_DOMAIN: &str = "media_player";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IntentType {
    /// Structured slots (artist, track, ...) forwarded to playback.
    PlayMediaAssist,
    /// Free-text query interpreted by a conversation agent.
    PlayMediaOnMediaPlayer,
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentType::PlayMediaAssist => "MassPlayMediaAssist",
            IntentType::PlayMediaOnMediaPlayer => "MassPlayMediaOnMediaPlayer",
        }
    }
}

/// Slot values of one intent invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentSlots(BTreeMap<String, Value>);

impl IntentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(slot.into(), value.into());
        self
    }

    /// Text value of a slot; blank values count as absent.
    pub fn text(&self, slot: &str) -> Option<String> {
        let text = match self.0.get(slot)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Radio mode is on for `true` and for any non-blank text.
    pub fn radio_mode(&self) -> bool {
        match self.0.get(RADIO_MODE_SLOT) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(_) => self.text(RADIO_MODE_SLOT).is_some(),
            None => false,
        }
    }

    /// Reference built from the first filled media slot.
    ///
    /// The slot decides the media type. An artist slot narrows a track or
    /// album, and an album slot narrows a track.
    pub fn media_reference(&self) -> Option<PlayMedia> {
        let (media_id, media_type) = MEDIA_SLOTS
            .iter()
            .find_map(|(slot, media_type)| Some((self.text(slot)?, *media_type)))?;

        let narrows = |by: MediaType| match by {
            MediaType::Artist => matches!(media_type, MediaType::Track | MediaType::Album),
            MediaType::Album => media_type == MediaType::Track,
            _ => false,
        };
        let artist = self
            .text(ARTIST_SLOT)
            .filter(|_| narrows(MediaType::Artist));
        let album = self.text(ALBUM_SLOT).filter(|_| narrows(MediaType::Album));

        Some(PlayMedia::Reference {
            media_id,
            media_type: Some(media_type),
            artist,
            album,
        })
    }

    /// Targeting constraints for the media player domain.
    pub fn match_constraints(&self) -> MatchConstraints {
        let name = self
            .text(NAME_SLOT)
            .filter(|name| !name.eq_ignore_ascii_case(ALL_TARGETS));
        MatchConstraints {
            name,
            area: self.text(AREA_SLOT),
            domains: vec![MEDIA_PLAYER_DOMAIN.to_string()],
        }
    }
}

/// Constraints handed to the host's entity matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchConstraints {
    pub name: Option<String>,
    pub area: Option<String>,
    pub domains: Vec<String>,
}

impl MatchConstraints {
    /// False when nothing narrows the target down.
    pub fn has_constraints(&self) -> bool {
        self.name.is_some() || self.area.is_some()
    }
}

/// One intent invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub intent_type: IntentType,
    pub slots: IntentSlots,
    pub language: String,
}

impl Intent {
    pub fn new(intent_type: IntentType, slots: IntentSlots) -> Self {
        Self {
            intent_type,
            slots,
            language: "en".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_all_means_no_name() {
        let constraints = IntentSlots::new().with(NAME_SLOT, "all").match_constraints();
        assert_eq!(constraints.name, None);
        assert!(!constraints.has_constraints());
    }

    #[test]
    fn area_alone_is_a_constraint() {
        let constraints = IntentSlots::new().with(AREA_SLOT, "Kitchen").match_constraints();
        assert!(constraints.has_constraints());
        assert_eq!(constraints.domains, vec!["media_player".to_string()]);
    }

    #[test]
    fn radio_mode_coerces_text_and_bool() {
        assert!(IntentSlots::new().with(RADIO_MODE_SLOT, "radio").radio_mode());
        assert!(IntentSlots::new().with(RADIO_MODE_SLOT, true).radio_mode());
        assert!(!IntentSlots::new().with(RADIO_MODE_SLOT, false).radio_mode());
        assert!(!IntentSlots::new().with(RADIO_MODE_SLOT, "").radio_mode());
        assert!(!IntentSlots::new().radio_mode());
    }

    #[test]
    fn blank_text_counts_as_absent() {
        assert_eq!(IntentSlots::new().with(QUERY_SLOT, "  ").text(QUERY_SLOT), None);
    }

    #[test]
    fn media_reference_takes_first_filled_slot() {
        let slots = IntentSlots::new()
            .with(ARTIST_SLOT, "Queen")
            .with(PLAYLIST_SLOT, "Morning");
        assert_eq!(
            slots.media_reference(),
            Some(PlayMedia::Reference {
                media_id: "Queen".into(),
                media_type: Some(MediaType::Artist),
                artist: None,
                album: None,
            })
        );
    }

    #[test]
    fn album_slot_keeps_its_type_and_artist() {
        let slots = IntentSlots::new()
            .with(ALBUM_SLOT, "A Night at the Opera")
            .with(ARTIST_SLOT, "Queen");
        assert_eq!(
            slots.media_reference(),
            Some(PlayMedia::Reference {
                media_id: "A Night at the Opera".into(),
                media_type: Some(MediaType::Album),
                artist: Some("Queen".into()),
                album: None,
            })
        );
    }

    #[test]
    fn track_is_narrowed_by_album_and_artist() {
        let slots = IntentSlots::new()
            .with(TRACK_SLOT, "Love of My Life")
            .with(ALBUM_SLOT, "A Night at the Opera")
            .with(ARTIST_SLOT, "Queen");
        let Some(PlayMedia::Reference {
            media_type,
            artist,
            album,
            ..
        }) = slots.media_reference()
        else {
            panic!("expected a reference");
        };
        assert_eq!(media_type, Some(MediaType::Track));
        assert_eq!(artist.as_deref(), Some("Queen"));
        assert_eq!(album.as_deref(), Some("A Night at the Opera"));
    }

    #[test]
    fn no_media_slot_means_no_reference() {
        let slots = IntentSlots::new()
            .with(NAME_SLOT, "Kitchen")
            .with(RADIO_MODE_SLOT, "radio");
        assert_eq!(slots.media_reference(), None);
    }
}
