//! Zeroconf announcements of Music Assistant servers.
//!
//! The announcement is network input: property values arrive as strings
//! or as already-typed JSON values depending on the host's decoder, and
//! servers add keys over time. Only `server_id` and `base_url` are
//! required.

use serde_json::Value;
use std::collections::BTreeMap;

use super::{DiscoveryError, ServerIdentity};
use crate::domain::foundation::ServerId;

const PROP_SERVER_ID: &str = "server_id";
const PROP_BASE_URL: &str = "base_url";
const PROP_SERVER_VERSION: &str = "server_version";
const PROP_SCHEMA_VERSION: &str = "schema_version";
const PROP_MIN_SCHEMA_VERSION: &str = "min_supported_schema_version";
const PROP_ADDON: &str = "homeassistant_addon";

/// A passive discovery event as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryInfo {
    pub hostname: Option<String>,
    pub properties: BTreeMap<String, Value>,
}

impl DiscoveryInfo {
    pub fn new(properties: BTreeMap<String, Value>) -> Self {
        Self {
            hostname: None,
            properties,
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The two required properties: who announced itself, and where.
    ///
    /// Enough to recognise a server that is already configured, even when
    /// the optional properties are garbled.
    pub fn announced_server(&self) -> Result<(ServerId, String), DiscoveryError> {
        let server_id = self
            .text(PROP_SERVER_ID)
            .ok_or(DiscoveryError::MissingServerId)?;
        let server_id =
            ServerId::new(server_id).map_err(|_| DiscoveryError::MissingServerId)?;
        let base_url = self
            .text(PROP_BASE_URL)
            .filter(|url| !url.is_empty())
            .ok_or(DiscoveryError::MissingBaseUrl)?;
        Ok((server_id, base_url))
    }

    /// Extracts the announced server identity.
    pub fn server_identity(&self) -> Result<ServerIdentity, DiscoveryError> {
        let (server_id, base_url) = self.announced_server()?;

        Ok(ServerIdentity {
            server_id,
            base_url,
            server_version: self
                .text(PROP_SERVER_VERSION)
                .unwrap_or_else(|| "0.0.0".to_string()),
            schema_version: self.number(PROP_SCHEMA_VERSION)?.unwrap_or(0),
            min_supported_schema_version: self.number(PROP_MIN_SCHEMA_VERSION)?.unwrap_or(0),
            homeassistant_addon: self.flag(PROP_ADDON),
        })
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &'static str) -> Result<Option<u32>, DiscoveryError> {
        let parsed = match self.properties.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        };
        parsed
            .map(Some)
            .ok_or(DiscoveryError::InvalidProperty(key))
    }

    fn flag(&self, key: &str) -> bool {
        match self.properties.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "true" | "1"),
            _ => false,
        }
    }
}
