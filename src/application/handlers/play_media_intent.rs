//! Play-media intents.
//!
//! Two intents start playback on a bridged player:
//!
//! - `MassPlayMediaAssist` forwards the structured media slots untouched
//!   and lets the server resolve them.
//! - `MassPlayMediaOnMediaPlayer` hands a free-text query to the
//!   configured conversation agent and expects a JSON media instruction
//!   back. Anything else the agent says is the answer itself and is
//!   returned to the user as a partial response.

use serde_json::{json, Value};
use std::sync::Arc;

use super::intent_target::{IntentTarget, IntentTargetResolver};
use crate::domain::foundation::PlayerId;
use crate::domain::intent::{
    AiMediaReply, Intent, IntentError, IntentResponse, IntentType, MediaIdRef, MediaItem,
    MediaType, PlayMedia, QUERY_SLOT,
};
use crate::domain::integration::IntegrationRecord;
use crate::ports::{
    ConfigEntryStore, ConnectionLookup, EntityMatcher, EntityRegistry, MassConnection,
    ServiceCaller,
};

const CONVERSATION_DOMAIN: &str = "conversation";
const CONVERSATION_PROCESS: &str = "process";
const VOICE_DOCS_ANCHOR: &str = "#ma-specific-conversation-agent";

/// Intents to register for the current set of records.
///
/// The free-text intent needs a conversation agent, so it is only offered
/// once some record has one configured.
pub fn intents_for(records: &[IntegrationRecord]) -> Vec<IntentType> {
    let mut intents = vec![IntentType::PlayMediaAssist];
    if records.iter().any(|r| r.options.agent_id().is_some()) {
        intents.push(IntentType::PlayMediaOnMediaPlayer);
    }
    intents
}

/// Extracts the agent's plain speech from a `conversation.process` response.
fn conversation_speech(response: &Value) -> Option<&str> {
    response
        .pointer("/response/speech/plain/speech")
        .and_then(Value::as_str)
}

/// Host collaborators shared by both intent handlers.
pub struct IntentDeps {
    pub entries: Arc<dyn ConfigEntryStore>,
    pub connections: Arc<dyn ConnectionLookup>,
    pub matcher: Arc<dyn EntityMatcher>,
    pub registry: Arc<dyn EntityRegistry>,
    pub services: Arc<dyn ServiceCaller>,
}

/// Handles `MassPlayMediaOnMediaPlayer`.
pub struct PlayMediaIntentHandler {
    entries: Arc<dyn ConfigEntryStore>,
    connections: Arc<dyn ConnectionLookup>,
    target: IntentTargetResolver,
    services: Arc<dyn ServiceCaller>,
    docs_voice_url: String,
}

impl PlayMediaIntentHandler {
    pub fn new(deps: &IntentDeps, docs_voice_url: impl Into<String>) -> Self {
        Self {
            entries: deps.entries.clone(),
            connections: deps.connections.clone(),
            target: IntentTargetResolver::new(deps.matcher.clone(), deps.registry.clone()),
            services: deps.services.clone(),
            docs_voice_url: docs_voice_url.into(),
        }
    }

    pub async fn handle(&self, intent: &Intent) -> Result<IntentResponse, IntentError> {
        let (record, connection) = self.loaded_connection().await?;
        let target = self.target.resolve(&intent.slots).await?;

        // Without a query there is nothing to ask the agent, so a missing
        // agent is only reported once a query is present.
        let Some(query) = intent.slots.text(QUERY_SLOT) else {
            return Err(IntentError::NoMediaItem);
        };
        let Some(agent_id) = record.options.agent_id() else {
            return Err(IntentError::AgentNotConfigured {
                docs_url: format!("{}{}", self.docs_voice_url, VOICE_DOCS_ANCHOR),
            });
        };

        let speech = self.ask_agent(agent_id, &query, &intent.language).await?;
        let Some(reply) = AiMediaReply::parse(&speech) else {
            tracing::debug!(agent_id, "Agent answered without a media instruction");
            return Ok(IntentResponse::partial(speech));
        };

        let media = resolve_media(connection.as_ref(), &reply).await?;
        // The agent's reply decides; the radio_mode slot is not consulted here.
        let radio_mode = reply.radio_mode.unwrap_or(false);
        play(connection.as_ref(), &target, media, radio_mode).await
    }

    /// First record the host has loaded, with its live connection.
    async fn loaded_connection(
        &self,
    ) -> Result<(IntegrationRecord, Arc<dyn MassConnection>), IntentError> {
        let records = self.entries.entries().await?;
        records
            .into_iter()
            .filter(IntegrationRecord::is_loaded)
            .find_map(|record| {
                let connection = self.connections.connection(&record.entry_id)?;
                Some((record, connection))
            })
            .ok_or(IntentError::NotLoaded)
    }

    async fn ask_agent(
        &self,
        agent_id: &str,
        query: &str,
        language: &str,
    ) -> Result<String, IntentError> {
        let data = json!({
            "agent_id": agent_id,
            "text": query,
            "language": language,
        });
        let response = self
            .services
            .call(CONVERSATION_DOMAIN, CONVERSATION_PROCESS, data, true)
            .await
            .map_err(|e| IntentError::Conversation(e.to_string()))?
            .unwrap_or(Value::Null);

        conversation_speech(&response)
            .map(str::to_string)
            .ok_or_else(|| IntentError::Conversation("agent returned no speech".to_string()))
    }
}

/// Looks up every id the agent named; a batch is played as one request.
async fn resolve_media(
    connection: &dyn MassConnection,
    reply: &AiMediaReply,
) -> Result<PlayMedia, IntentError> {
    let lookup = move |name: String, media_type: MediaType| async move {
        connection
            .get_item_by_name(&name, media_type)
            .await
            .map_err(|e| IntentError::Remote(e.message))
    };

    match &reply.media_id {
        MediaIdRef::One(name) => Ok(PlayMedia::Item(lookup(name.clone(), reply.media_type).await?)),
        MediaIdRef::Many(names) if names.is_empty() => Err(IntentError::NoMediaItem),
        MediaIdRef::Many(names) => {
            let mut items: Vec<MediaItem> = Vec::with_capacity(names.len());
            for name in names {
                items.push(lookup(name.clone(), reply.media_type).await?);
            }
            Ok(PlayMedia::Items(items))
        }
    }
}

async fn play(
    connection: &dyn MassConnection,
    target: &IntentTarget,
    media: PlayMedia,
    radio_mode: bool,
) -> Result<IntentResponse, IntentError> {
    connection
        .play_media(&target.player_id, media, radio_mode)
        .await
        .map_err(|e| {
            tracing::warn!(player_id = %target.player_id, error = %e, "Playback failed");
            IntentError::Remote(e.message)
        })?;

    tracing::info!(player_id = %target.player_id, radio_mode, "Started playback from intent");
    Ok(IntentResponse::done())
}

/// Handles `MassPlayMediaAssist`.
pub struct AssistPlayMediaHandler {
    entries: Arc<dyn ConfigEntryStore>,
    connections: Arc<dyn ConnectionLookup>,
    target: IntentTargetResolver,
}

impl AssistPlayMediaHandler {
    pub fn new(deps: &IntentDeps) -> Self {
        Self {
            entries: deps.entries.clone(),
            connections: deps.connections.clone(),
            target: IntentTargetResolver::new(deps.matcher.clone(), deps.registry.clone()),
        }
    }

    pub async fn handle(&self, intent: &Intent) -> Result<IntentResponse, IntentError> {
        let target = self.target.resolve(&intent.slots).await?;
        let media = intent
            .slots
            .media_reference()
            .ok_or(IntentError::NoMediaItem)?;
        let connection = self.owning_connection(&target.player_id).await?;

        play(connection.as_ref(), &target, media, intent.slots.radio_mode()).await
    }

    /// Connection of the loaded record that serves `player_id`.
    async fn owning_connection(
        &self,
        player_id: &PlayerId,
    ) -> Result<Arc<dyn MassConnection>, IntentError> {
        let connections: Vec<Arc<dyn MassConnection>> = self
            .entries
            .entries()
            .await?
            .iter()
            .filter(|r| r.is_loaded())
            .filter_map(|r| self.connections.connection(&r.entry_id))
            .collect();

        if connections.is_empty() {
            return Err(IntentError::NotLoaded);
        }

        connections
            .into_iter()
            .find(|c| c.player(player_id).is_some())
            .ok_or_else(|| IntentError::Remote(format!("Player {} is not available", player_id)))
    }
}

/// Dispatches intents to their handler.
pub struct IntentRouter {
    assist: AssistPlayMediaHandler,
    query: PlayMediaIntentHandler,
}

impl IntentRouter {
    pub fn new(deps: IntentDeps, docs_voice_url: impl Into<String>) -> Self {
        Self {
            assist: AssistPlayMediaHandler::new(&deps),
            query: PlayMediaIntentHandler::new(&deps, docs_voice_url),
        }
    }

    pub async fn handle(&self, intent: &Intent) -> Result<IntentResponse, IntentError> {
        let result = match intent.intent_type {
            IntentType::PlayMediaAssist => self.assist.handle(intent).await,
            IntentType::PlayMediaOnMediaPlayer => self.query.handle(intent).await,
        };
        if let Err(err) = &result {
            tracing::debug!(intent = intent.intent_type.as_str(), error = %err, "Intent failed");
        }
        result
    }
}
