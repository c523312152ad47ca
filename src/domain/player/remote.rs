//! Player snapshot as reported by the Music Assistant server.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    #[default]
    Player,
    StereoPair,
    Group,
    Protocol,
    #[serde(other)]
    Unknown,
}

impl PlayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerType::Player => "player",
            PlayerType::StereoPair => "stereo_pair",
            PlayerType::Group => "group",
            PlayerType::Protocol => "protocol",
            PlayerType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Idle,
    Paused,
    Playing,
}

/// Hardware details a player reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDeviceInfo {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    /// Provider instance that owns the player.
    pub provider: String,
    #[serde(rename = "type", default)]
    pub player_type: PlayerType,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub powered: bool,
    #[serde(rename = "state", default)]
    pub playback_state: PlaybackState,
    /// Queue (or external source) the player is currently tuned in to.
    #[serde(default)]
    pub active_source: Option<String>,
    /// Group player this player currently plays as a member of.
    #[serde(default)]
    pub active_group: Option<String>,
    #[serde(default)]
    pub group_childs: Vec<String>,
    #[serde(default)]
    pub synced_to: Option<String>,
    #[serde(default)]
    pub device_info: PlayerDeviceInfo,
}

impl Player {
    pub fn new(player_id: PlayerId, provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            player_id,
            provider: provider.into(),
            player_type: PlayerType::Player,
            name: name.into(),
            display_name: None,
            available: true,
            powered: true,
            playback_state: PlaybackState::Idle,
            active_source: None,
            active_group: None,
            group_childs: Vec::new(),
            synced_to: None,
            device_info: PlayerDeviceInfo::default(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_group(&self) -> bool {
        self.player_type == PlayerType::Group || !self.group_childs.is_empty()
    }

    /// Ids whose queue updates concern this player: its own queue, the
    /// source it is tuned in to and the group it plays in.
    pub fn related_ids(&self) -> [Option<&str>; 3] {
        [
            Some(self.player_id.as_str()),
            self.active_source.as_deref(),
            self.active_group.as_deref(),
        ]
    }

    pub fn is_related_to(&self, object_id: &str) -> bool {
        self.related_ids().iter().flatten().any(|id| *id == object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_server_payload() {
        let player: Player = serde_json::from_value(json!({
            "player_id": "kitchen",
            "provider": "sonos--abc",
            "type": "player",
            "name": "Kitchen",
            "available": true,
            "powered": true,
            "state": "playing",
            "active_source": "living_room",
            "device_info": {"model": "One", "manufacturer": "Sonos"},
            "some_future_field": 1
        }))
        .unwrap();

        assert_eq!(player.playback_state, PlaybackState::Playing);
        assert_eq!(player.device_info.model.as_deref(), Some("One"));
        assert_eq!(player.display_name(), "Kitchen");
    }

    #[test]
    fn unknown_player_type_is_tolerated() {
        let kind: PlayerType = serde_json::from_value(json!("hologram")).unwrap();
        assert_eq!(kind, PlayerType::Unknown);
    }

    #[test]
    fn related_ids_cover_own_source_and_group() {
        let mut player = Player::new(PlayerId::new("p1").unwrap(), "prov", "P1");
        player.active_source = Some("src".into());
        player.active_group = Some("grp".into());

        assert!(player.is_related_to("p1"));
        assert!(player.is_related_to("src"));
        assert!(player.is_related_to("grp"));
        assert!(!player.is_related_to("other"));
    }
}
