//! Setup flow configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::server::is_server_url;

/// Defaults shown by the setup and options flows
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// URL pre-filled into the manual setup form
    #[serde(default = "default_url")]
    pub default_url: String,

    /// Title given to newly created records
    #[serde(default = "default_title")]
    pub default_title: String,

    /// Voice documentation linked from the options form and from intent errors
    #[serde(default = "default_docs_voice_url")]
    pub docs_voice_url: String,
}

impl FlowConfig {
    /// Validate flow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_server_url(&self.default_url) {
            return Err(ValidationError::InvalidServerUrl);
        }
        if self.default_title.trim().is_empty() {
            return Err(ValidationError::MissingRequired("FLOW__DEFAULT_TITLE"));
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            default_url: default_url(),
            default_title: default_title(),
            docs_voice_url: default_docs_voice_url(),
        }
    }
}

fn default_url() -> String {
    "http://mass.local:8095".to_string()
}

fn default_title() -> String {
    "Music Assistant".to_string()
}

fn default_docs_voice_url() -> String {
    "https://music-assistant.io/integration/voice/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = FlowConfig::default();
        assert_eq!(config.default_url, "http://mass.local:8095");
        assert_eq!(config.default_title, "Music Assistant");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_http_default_url() {
        let config = FlowConfig {
            default_url: "mass.local:8095".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidServerUrl));
    }

    #[test]
    fn rejects_blank_title() {
        let config = FlowConfig {
            default_title: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
