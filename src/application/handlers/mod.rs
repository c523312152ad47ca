//! Application handlers.
//!
//! One handler per bridge operation:
//! - `ServerInfoResolver` - Reads a server's identity
//! - `ConfigFlow` / `OptionsFlow` - Record reconciliation and settings
//! - `BridgedEntity` - Player state projection
//! - `IntentRouter` - Voice intents that start playback

mod config_flow;
mod entity_bridge;
mod intent_target;
mod options_flow;
mod play_media_intent;
mod server_info;

pub use config_flow::{ConfigFlow, FlowContext};
pub use entity_bridge::{AttachedEntity, BridgedEntity};
pub use intent_target::{IntentTarget, IntentTargetResolver};
pub use options_flow::{OptionsFlow, OptionsInput};
pub use play_media_intent::{
    intents_for, AssistPlayMediaHandler, IntentDeps, IntentRouter, PlayMediaIntentHandler,
};
pub use server_info::ServerInfoResolver;
