//! Integration tests for intent routing.
//!
//! Wires the intent router to in-memory host adapters, a scripted
//! conversation agent and an in-memory server connection.

use std::sync::Arc;

use mass_bridge::adapters::{
    HostEntity, InMemoryConfigEntryStore, InMemoryConnectionLookup, InMemoryEntityMatcher,
    InMemoryMassConnection, MockServiceCaller,
};
use mass_bridge::application::{IntentDeps, IntentRouter};
use mass_bridge::domain::foundation::{PlayerId, ServerId};
use mass_bridge::domain::integration::{EntryState, IntegrationOptions, NewIntegrationRecord};
use mass_bridge::domain::intent::{
    Intent, IntentError, IntentResponseType, IntentSlots, IntentType, AREA_SLOT, NAME_SLOT,
    QUERY_SLOT, TRACK_SLOT,
};
use mass_bridge::domain::player::{Player, ATTR_MASS_PLAYER_TYPE};
use mass_bridge::ports::{ConfigEntryStore, HostState};

const DOCS: &str = "https://music-assistant.io/integration/voice/";

struct World {
    entries: InMemoryConfigEntryStore,
    connection: InMemoryMassConnection,
    matcher: InMemoryEntityMatcher,
    router: IntentRouter,
}

async fn world(services: MockServiceCaller, loaded: bool) -> World {
    let entries = InMemoryConfigEntryStore::new();
    let record = entries
        .create(NewIntegrationRecord {
            unique_id: ServerId::new("1234").unwrap(),
            title: "Music Assistant".into(),
            base_url: "http://h1:8095".into(),
            options: IntegrationOptions {
                conversation_agent_id: Some("conversation.openai".into()),
                auto_expose_players: Some(true),
            },
        })
        .await
        .unwrap();
    if loaded {
        entries.set_state(&record.entry_id, EntryState::Loaded).await;
    }

    let connection = InMemoryMassConnection::new("http://h1:8095").with_player(Player::new(
        PlayerId::new("kitchen").unwrap(),
        "sonos--1",
        "Kitchen",
    ));
    let connections = InMemoryConnectionLookup::new();
    connections.insert(record.entry_id, Arc::new(connection.clone()));

    let matcher = InMemoryEntityMatcher::new().with_entity(
        HostEntity::new(
            HostState::new("media_player.kitchen").with_attribute(ATTR_MASS_PLAYER_TYPE, "player"),
            "Kitchen",
        )
        .in_area("Kitchen")
        .with_unique_id("mass_kitchen"),
    );

    let router = IntentRouter::new(
        IntentDeps {
            entries: Arc::new(entries.clone()),
            connections: Arc::new(connections),
            matcher: Arc::new(matcher.clone()),
            registry: Arc::new(matcher.clone()),
            services: Arc::new(services),
        },
        DOCS,
    );

    World {
        entries,
        connection,
        matcher,
        router,
    }
}

#[tokio::test]
async fn prose_answer_is_returned_verbatim_as_partial() {
    let w = world(
        MockServiceCaller::new().with_speech("Sorry, I don't know."),
        true,
    )
    .await;
    let intent = Intent::new(
        IntentType::PlayMediaOnMediaPlayer,
        IntentSlots::new()
            .with(AREA_SLOT, "Kitchen")
            .with(QUERY_SLOT, "play the song from that movie"),
    );

    let response = w.router.handle(&intent).await.unwrap();

    assert_eq!(response.response_type, IntentResponseType::PartialActionDone);
    assert_eq!(response.speech, "Sorry, I don't know.");
    assert!(w.connection.plays().is_empty());
}

#[tokio::test]
async fn untargeted_intent_is_refused_for_every_intent_type() {
    let w = world(MockServiceCaller::new(), true).await;

    for intent_type in [IntentType::PlayMediaAssist, IntentType::PlayMediaOnMediaPlayer] {
        let intent = Intent::new(
            intent_type,
            IntentSlots::new()
                .with(NAME_SLOT, "all")
                .with(TRACK_SLOT, "Yesterday")
                .with(QUERY_SLOT, "play yesterday"),
        );

        let err = w.router.handle(&intent).await.unwrap_err();
        assert!(matches!(err, IntentError::CannotTargetAll));
        assert_eq!(err.to_string(), "Service handler cannot target all devices");
    }
    assert_eq!(w.matcher.match_calls(), 0);
}

#[tokio::test]
async fn free_text_requires_a_loaded_record() {
    let w = world(MockServiceCaller::new(), false).await;
    assert_eq!(w.entries.entries().await.unwrap().len(), 1);

    let intent = Intent::new(
        IntentType::PlayMediaOnMediaPlayer,
        IntentSlots::new()
            .with(NAME_SLOT, "Kitchen")
            .with(QUERY_SLOT, "play something"),
    );

    let err = w.router.handle(&intent).await.unwrap_err();
    assert_eq!(err.to_string(), "Music Assistant not loaded");
}

#[tokio::test]
async fn unknown_player_name_fails_matching() {
    let w = world(MockServiceCaller::new(), true).await;
    let intent = Intent::new(
        IntentType::PlayMediaAssist,
        IntentSlots::new()
            .with(NAME_SLOT, "Garage")
            .with(TRACK_SLOT, "Yesterday"),
    );

    let err = w.router.handle(&intent).await.unwrap_err();
    assert!(matches!(err, IntentError::MatchFailed { .. }));
}
