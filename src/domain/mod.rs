//! Domain layer containing the bridge's types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, errors, state machine trait)
//! - `server` - Server identity, discovery announcements, resolve errors
//! - `integration` - Stored integration records
//! - `flow` - Connection-setup steps, inputs and results
//! - `player` - Remote players, push events, rendered entity state
//! - `intent` - Intent slots, media references, responses

pub mod flow;
pub mod foundation;
pub mod integration;
pub mod intent;
pub mod player;
pub mod server;
