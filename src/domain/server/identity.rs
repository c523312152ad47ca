//! Identity and version metadata of a Music Assistant server.

use serde::{Deserialize, Serialize};

use super::ResolveError;
use crate::domain::foundation::ServerId;

/// What a server reports about itself on connect or in a discovery
/// announcement.
///
/// Immutable once obtained; `server_id` is the uniqueness key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerIdentity {
    pub server_id: ServerId,
    pub base_url: String,
    pub server_version: String,
    pub schema_version: u32,
    pub min_supported_schema_version: u32,
    /// Server runs as a host add-on.
    #[serde(default)]
    pub homeassistant_addon: bool,
}

impl ServerIdentity {
    /// Checks that this server and a client speaking `client_schema`
    /// (accepting servers down to `client_min_schema`) can talk.
    pub fn check_compatible(
        &self,
        client_schema: u32,
        client_min_schema: u32,
    ) -> Result<(), ResolveError> {
        if self.schema_version < client_min_schema {
            return Err(ResolveError::InvalidServerVersion(format!(
                "server schema {} is older than the minimum supported {}",
                self.schema_version, client_min_schema
            )));
        }
        if self.min_supported_schema_version > client_schema {
            return Err(ResolveError::InvalidServerVersion(format!(
                "server requires schema {} but this client speaks {}",
                self.min_supported_schema_version, client_schema
            )));
        }
        Ok(())
    }
}
