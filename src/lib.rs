//! mass-bridge - Music Assistant bridge for a home-automation host
//!
//! Reconciles discovered and manually entered Music Assistant servers into
//! integration records, mirrors the server's players as host entities and
//! routes voice intents to playback.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
