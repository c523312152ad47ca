//! What a flow step hands back to the host.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::integration::IntegrationRecord;
use crate::domain::server::ResolveError;

pub const FIELD_URL: &str = "url";
pub const FIELD_CONVERSATION_AGENT: &str = "conversation_agent_id";
pub const FIELD_AUTO_EXPOSE_PLAYERS: &str = "auto_expose_players";

/// Outcome of one flow step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    /// Show (or re-show) a form.
    Form(FormView),
    /// A new record was created. Terminal success of a setup flow.
    CreateEntry(IntegrationRecord),
    /// Options were stored on an existing record.
    Saved(IntegrationRecord),
    /// The flow ended without creating anything.
    Abort { reason: AbortReason },
}

impl FlowResult {
    pub fn abort(reason: AbortReason) -> Self {
        FlowResult::Abort { reason }
    }

    pub fn form(&self) -> Option<&FormView> {
        match self {
            FlowResult::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            FlowResult::Abort { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// Why a flow ended without a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    AlreadyConfigured,
    AlreadyInProgress,
    /// An existing record was updated; callers treat this as success.
    ReconfigurationSuccessful,
    CannotConnect,
    InvalidServerVersion,
    Unknown,
    InvalidDiscoveryInfo,
}

impl AbortReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbortReason::AlreadyConfigured => "already_configured",
            AbortReason::AlreadyInProgress => "already_in_progress",
            AbortReason::ReconfigurationSuccessful => "reconfiguration_successful",
            AbortReason::CannotConnect => "cannot_connect",
            AbortReason::InvalidServerVersion => "invalid_server_version",
            AbortReason::Unknown => "unknown",
            AbortReason::InvalidDiscoveryInfo => "invalid_discovery_info",
        }
    }

    /// Abort reasons that report a completed reconfiguration.
    pub fn is_success(&self) -> bool {
        matches!(self, AbortReason::ReconfigurationSuccessful)
    }
}

impl From<&ResolveError> for AbortReason {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::CannotConnect(_) => AbortReason::CannotConnect,
            ResolveError::InvalidServerVersion(_) => AbortReason::InvalidServerVersion,
            ResolveError::Unknown(_) => AbortReason::Unknown,
        }
    }
}

/// Error tag attached to a re-shown form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    CannotConnect,
    InvalidServerVersion,
    Unknown,
    InvalidUrl,
}

impl FormError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormError::CannotConnect => "cannot_connect",
            FormError::InvalidServerVersion => "invalid_server_version",
            FormError::Unknown => "unknown",
            FormError::InvalidUrl => "invalid_url",
        }
    }
}

impl From<&ResolveError> for FormError {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::CannotConnect(_) => FormError::CannotConnect,
            ResolveError::InvalidServerVersion(_) => FormError::InvalidServerVersion,
            ResolveError::Unknown(_) => FormError::Unknown,
        }
    }
}

/// Kind of input a form field expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Url,
    Bool,
    ConversationAgent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value pre-filled into the field.
    pub default: Option<Value>,
    /// Value offered as a hint but not submitted unless kept.
    pub suggested: Option<Value>,
}

impl FormField {
    pub fn required(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            required: true,
            default: None,
            suggested: None,
        }
    }

    pub fn optional(key: &'static str, kind: FieldKind) -> Self {
        Self {
            required: false,
            ..Self::required(key, kind)
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_suggested(mut self, value: Option<Value>) -> Self {
        self.suggested = value;
        self
    }
}

/// A form the host renders for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub step_id: &'static str,
    pub fields: Vec<FormField>,
    pub error: Option<FormError>,
    pub placeholders: BTreeMap<String, String>,
}

impl FormView {
    pub fn new(step_id: &'static str) -> Self {
        Self {
            step_id,
            fields: Vec::new(),
            error: None,
            placeholders: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_error(mut self, error: FormError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_placeholder(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.placeholders.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// URL the form pre-fills, if it has a URL field.
    pub fn default_url(&self) -> Option<&str> {
        self.field(FIELD_URL)?.default.as_ref()?.as_str()
    }
}
