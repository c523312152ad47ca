//! Player module - remote players, their push events and the entity
//! state the host renders for them.

mod entity_state;
mod event;
mod remote;

pub use entity_state::{
    entity_unique_id, player_available, player_id_from_unique_id, DeviceInfo, EntityState,
    MediaPlayerState, ATTR_ACTIVE_GROUP, ATTR_ACTIVE_QUEUE, ATTR_GROUP_LEADER, ATTR_GROUP_MEMBERS,
    ATTR_IS_GROUP, ATTR_MASS_PLAYER_ID, ATTR_MASS_PLAYER_TYPE, ENTITY_ID_PREFIX, INTEGRATION_DOMAIN,
};
pub use event::{EventFilter, EventType, MassEvent};
pub use remote::{PlaybackState, Player, PlayerDeviceInfo, PlayerType};
