//! Host-side projection of a player: entity id, device and rendered state.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::{PlaybackState, Player};
use crate::domain::foundation::PlayerId;

pub const INTEGRATION_DOMAIN: &str = "mass";
pub const ENTITY_ID_PREFIX: &str = "mass_";

pub const ATTR_MASS_PLAYER_ID: &str = "mass_player_id";
/// Marks an entity as a bridged player; the intent router filters on it.
pub const ATTR_MASS_PLAYER_TYPE: &str = "mass_player_type";
pub const ATTR_ACTIVE_QUEUE: &str = "active_queue";
pub const ATTR_ACTIVE_GROUP: &str = "active_group";
pub const ATTR_IS_GROUP: &str = "is_group";
pub const ATTR_GROUP_MEMBERS: &str = "group_members";
pub const ATTR_GROUP_LEADER: &str = "group_leader";

/// Unique id of the entity bridging `player_id`, optionally for a keyed
/// sub-entity.
pub fn entity_unique_id(player_id: &PlayerId, key: Option<&str>) -> String {
    match key {
        Some(key) => format!("{}{}_{}", ENTITY_ID_PREFIX, player_id, key),
        None => format!("{}{}", ENTITY_ID_PREFIX, player_id),
    }
}

/// Reverse of [`entity_unique_id`] for the main player entity.
pub fn player_id_from_unique_id(unique_id: &str) -> Option<PlayerId> {
    unique_id
        .strip_prefix(ENTITY_ID_PREFIX)
        .and_then(|id| PlayerId::new(id).ok())
}

/// Availability of a bridged player. Never cached: a dropped connection
/// makes every entity unavailable at its next read.
pub fn player_available(player: Option<&Player>, connected: bool) -> bool {
    player.is_some_and(|p| p.available) && connected
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPlayerState {
    Off,
    Idle,
    Paused,
    Playing,
}

/// State written to the host for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub unique_id: String,
    pub state: MediaPlayerState,
    pub available: bool,
    pub attributes: BTreeMap<String, Value>,
}

impl EntityState {
    /// Renders the entity for `player`; a player that vanished from the
    /// connection renders as an unavailable, off entity.
    pub fn render(unique_id: &str, player: Option<&Player>, connected: bool) -> Self {
        let available = player_available(player, connected);
        let Some(player) = player else {
            return Self {
                unique_id: unique_id.to_string(),
                state: MediaPlayerState::Off,
                available,
                attributes: BTreeMap::new(),
            };
        };

        let state = if !player.powered {
            MediaPlayerState::Off
        } else {
            match player.playback_state {
                PlaybackState::Playing => MediaPlayerState::Playing,
                PlaybackState::Paused => MediaPlayerState::Paused,
                PlaybackState::Idle => MediaPlayerState::Idle,
            }
        };

        let mut attributes = BTreeMap::new();
        attributes.insert(ATTR_MASS_PLAYER_ID.to_string(), json!(player.player_id));
        attributes.insert(
            ATTR_MASS_PLAYER_TYPE.to_string(),
            json!(player.player_type.as_str()),
        );
        attributes.insert(
            ATTR_ACTIVE_QUEUE.to_string(),
            json!(player
                .active_source
                .as_deref()
                .unwrap_or(player.player_id.as_str())),
        );
        attributes.insert(ATTR_ACTIVE_GROUP.to_string(), json!(player.active_group));
        attributes.insert(ATTR_IS_GROUP.to_string(), json!(player.is_group()));
        attributes.insert(ATTR_GROUP_MEMBERS.to_string(), json!(player.group_childs));
        let leader = player.synced_to.clone().or_else(|| {
            (!player.group_childs.is_empty()).then(|| player.player_id.to_string())
        });
        attributes.insert(ATTR_GROUP_LEADER.to_string(), json!(leader));

        Self {
            unique_id: unique_id.to_string(),
            state,
            available,
            attributes,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Device registry entry for a bridged player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub connections: Vec<(String, String)>,
    pub manufacturer: Option<String>,
    pub model: String,
    pub name: String,
    pub configuration_url: String,
    pub sw_version: Option<String>,
    pub model_id: Option<String>,
}

impl DeviceInfo {
    /// Builds device info, falling back to the provider's name when the
    /// player does not report a manufacturer.
    pub fn for_player(player: &Player, provider_name: Option<&str>, server_url: &str) -> Self {
        let info = &player.device_info;
        Self {
            identifiers: vec![(INTEGRATION_DOMAIN.to_string(), player.player_id.to_string())],
            connections: info
                .mac_address
                .iter()
                .map(|mac| ("mac".to_string(), mac.clone()))
                .collect(),
            manufacturer: info
                .manufacturer
                .clone()
                .or_else(|| provider_name.map(str::to_string)),
            model: info.model.clone().unwrap_or_else(|| player.name.clone()),
            name: player.display_name().to_string(),
            configuration_url: format!(
                "{}/#/settings/editplayer/{}",
                server_url.trim_end_matches('/'),
                player.player_id
            ),
            sw_version: info.software_version.clone(),
            model_id: info.model_id.clone(),
        }
    }
}
