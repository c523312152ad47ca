//! Application layer - Handlers orchestrating domain rules over the ports.

pub mod handlers;

pub use handlers::{
    intents_for, AssistPlayMediaHandler, AttachedEntity, BridgedEntity, ConfigFlow, FlowContext,
    IntentDeps, IntentRouter, IntentTarget, IntentTargetResolver, OptionsFlow, OptionsInput,
    PlayMediaIntentHandler, ServerInfoResolver,
};
