//! IntegrationRecord - the host-persisted configuration of one server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryId, ServerId};

/// User-tunable settings stored alongside the server address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationOptions {
    /// Conversation agent that interprets free-text media queries.
    pub conversation_agent_id: Option<String>,
    /// Expose every bridged player to the voice assistant automatically.
    pub auto_expose_players: Option<bool>,
}

impl IntegrationOptions {
    /// Configured agent id, ignoring blank values.
    pub fn agent_id(&self) -> Option<&str> {
        self.conversation_agent_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Lifecycle of a record inside the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    #[default]
    NotLoaded,
    Loaded,
    SetupError,
}

/// One record per distinct `server_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationRecord {
    pub entry_id: EntryId,
    pub unique_id: ServerId,
    pub title: String,
    pub base_url: String,
    #[serde(default)]
    pub options: IntegrationOptions,
    #[serde(default)]
    pub state: EntryState,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl IntegrationRecord {
    pub fn is_loaded(&self) -> bool {
        self.state == EntryState::Loaded
    }

    /// Applies an in-place update, bumping `modified_at` when anything changed.
    pub fn apply(&mut self, update: &RecordUpdate) -> bool {
        let mut changed = false;
        if let Some(url) = &update.base_url {
            if *url != self.base_url {
                self.base_url = url.clone();
                changed = true;
            }
        }
        if let Some(title) = &update.title {
            if *title != self.title {
                self.title = title.clone();
                changed = true;
            }
        }
        if let Some(options) = &update.options {
            if *options != self.options {
                self.options = options.clone();
                changed = true;
            }
        }
        if changed {
            self.modified_at = Utc::now();
        }
        changed
    }
}

/// Request to create a record; the host assigns the entry id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIntegrationRecord {
    pub unique_id: ServerId,
    pub title: String,
    pub base_url: String,
    pub options: IntegrationOptions,
}

impl NewIntegrationRecord {
    /// Materialises the record with a fresh entry id.
    pub fn into_record(self) -> IntegrationRecord {
        let now = Utc::now();
        IntegrationRecord {
            entry_id: EntryId::new(),
            unique_id: self.unique_id,
            title: self.title,
            base_url: self.base_url,
            options: self.options,
            state: EntryState::NotLoaded,
            created_at: now,
            modified_at: now,
        }
    }
}

/// Partial update of a stored record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    pub base_url: Option<String>,
    pub title: Option<String>,
    pub options: Option<IntegrationOptions>,
}

impl RecordUpdate {
    pub fn base_url(url: impl Into<String>) -> Self {
        Self {
            base_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_options(mut self, options: IntegrationOptions) -> Self {
        self.options = Some(options);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IntegrationRecord {
        NewIntegrationRecord {
            unique_id: ServerId::new("1234").unwrap(),
            title: "Music Assistant".to_string(),
            base_url: "http://h1:8095".to_string(),
            options: IntegrationOptions::default(),
        }
        .into_record()
    }

    #[test]
    fn new_record_starts_not_loaded() {
        let record = record();
        assert_eq!(record.state, EntryState::NotLoaded);
        assert_eq!(record.created_at, record.modified_at);
    }

    #[test]
    fn apply_changes_base_url_in_place() {
        let mut record = record();
        let entry_id = record.entry_id;

        assert!(record.apply(&RecordUpdate::base_url("http://h2:8095")));
        assert_eq!(record.base_url, "http://h2:8095");
        assert_eq!(record.entry_id, entry_id);
    }

    #[test]
    fn apply_reports_no_change_for_identical_values() {
        let mut record = record();
        let update = RecordUpdate::base_url("http://h1:8095").with_title("Music Assistant");
        assert!(!record.apply(&update));
    }

    #[test]
    fn blank_agent_id_counts_as_unset() {
        let options = IntegrationOptions {
            conversation_agent_id: Some("  ".to_string()),
            auto_expose_players: None,
        };
        assert_eq!(options.agent_id(), None);
    }
}
