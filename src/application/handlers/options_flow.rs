//! OptionsFlow - edits the settings of an existing integration record.

use serde_json::Value;
use std::sync::Arc;

use crate::config::FlowConfig;
use crate::domain::flow::{
    FieldKind, FlowError, FlowResult, FormError, FormField, FormView, FIELD_AUTO_EXPOSE_PLAYERS,
    FIELD_CONVERSATION_AGENT, FIELD_URL,
};
use crate::domain::foundation::{DomainError, EntryId, ErrorCode};
use crate::domain::integration::{IntegrationOptions, IntegrationRecord, RecordUpdate};
use crate::domain::server::is_server_url;
use crate::ports::ConfigEntryStore;

const STEP_INIT: &str = "init";
const PLACEHOLDER_DOCS_VOICE_URL: &str = "docs_voice_url";

/// Values submitted on the options form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsInput {
    pub url: String,
    pub conversation_agent_id: Option<String>,
    pub auto_expose_players: Option<bool>,
}

impl OptionsInput {
    fn options(&self) -> IntegrationOptions {
        IntegrationOptions {
            conversation_agent_id: self.conversation_agent_id.clone(),
            auto_expose_players: self.auto_expose_players,
        }
    }
}

pub struct OptionsFlow {
    entry_id: EntryId,
    entries: Arc<dyn ConfigEntryStore>,
    settings: FlowConfig,
}

impl OptionsFlow {
    pub fn new(entry_id: EntryId, entries: Arc<dyn ConfigEntryStore>, settings: FlowConfig) -> Self {
        Self {
            entry_id,
            entries,
            settings,
        }
    }

    /// Shows the options form, suggesting the record's current values.
    pub async fn init(&self) -> Result<FlowResult, FlowError> {
        let record = self.record().await?;
        Ok(FlowResult::Form(self.form(
            Some(record.base_url.as_str()),
            &record.options,
            None,
        )))
    }

    /// Stores the submitted values and reloads the record once.
    pub async fn submit(&self, input: OptionsInput) -> Result<FlowResult, FlowError> {
        if !is_server_url(input.url.trim()) {
            return Ok(FlowResult::Form(self.form(
                Some(input.url.as_str()),
                &input.options(),
                Some(FormError::InvalidUrl),
            )));
        }

        let update = RecordUpdate::base_url(input.url.trim()).with_options(input.options());
        let record = self.entries.update(&self.entry_id, update).await?;
        self.entries.reload(&self.entry_id).await?;

        tracing::info!(
            entry_id = %self.entry_id,
            url = %record.base_url,
            agent = ?record.options.agent_id(),
            "Updated integration options"
        );
        Ok(FlowResult::Saved(record))
    }

    async fn record(&self) -> Result<IntegrationRecord, FlowError> {
        self.entries.get(&self.entry_id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::EntryNotFound, "Config entry not found")
                .with_detail("entry_id", self.entry_id.to_string())
                .into()
        })
    }

    fn form(
        &self,
        url: Option<&str>,
        options: &IntegrationOptions,
        error: Option<FormError>,
    ) -> FormView {
        let mut form = FormView::new(STEP_INIT)
            .with_field(
                FormField::required(FIELD_URL, FieldKind::Url)
                    .with_suggested(url.map(Value::from)),
            )
            .with_field(
                FormField::optional(FIELD_CONVERSATION_AGENT, FieldKind::ConversationAgent)
                    .with_suggested(options.conversation_agent_id.clone().map(Value::from)),
            )
            .with_field(
                FormField::optional(FIELD_AUTO_EXPOSE_PLAYERS, FieldKind::Bool)
                    .with_suggested(options.auto_expose_players.map(Value::from)),
            )
            .with_placeholder(PLACEHOLDER_DOCS_VOICE_URL, self.settings.docs_voice_url.clone());
        if let Some(error) = error {
            form = form.with_error(error);
        }
        form
    }
}
