//! Intent targeting - from name/area slots to one bridged player.

use std::sync::Arc;

use crate::domain::foundation::PlayerId;
use crate::domain::intent::{IntentError, IntentSlots};
use crate::domain::player::{player_id_from_unique_id, ATTR_MASS_PLAYER_TYPE};
use crate::ports::{EntityMatcher, EntityRegistry};

/// The entity an intent will act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentTarget {
    pub entity_id: String,
    pub player_id: PlayerId,
}

pub struct IntentTargetResolver {
    matcher: Arc<dyn EntityMatcher>,
    registry: Arc<dyn EntityRegistry>,
}

impl IntentTargetResolver {
    pub fn new(matcher: Arc<dyn EntityMatcher>, registry: Arc<dyn EntityRegistry>) -> Self {
        Self { matcher, registry }
    }

    /// Picks the first bridged media player matching the slots.
    ///
    /// Slots that constrain nothing are refused rather than fanned out to
    /// every player.
    pub async fn resolve(&self, slots: &IntentSlots) -> Result<IntentTarget, IntentError> {
        let constraints = slots.match_constraints();
        if !constraints.has_constraints() {
            return Err(IntentError::CannotTargetAll);
        }

        let failed = || IntentError::MatchFailed {
            name: constraints.name.clone(),
            area: constraints.area.clone(),
        };

        let result = self.matcher.match_targets(&constraints).await;
        if !result.is_match {
            return Err(failed());
        }

        let state = result
            .states
            .into_iter()
            .find(|state| state.has_attribute(ATTR_MASS_PLAYER_TYPE))
            .ok_or_else(failed)?;

        let player_id = self
            .registry
            .unique_id(&state.entity_id)
            .as_deref()
            .and_then(player_id_from_unique_id)
            .ok_or_else(|| IntentError::NoTargetMatched {
                name: constraints.name.clone(),
                area: constraints.area.clone(),
            })?;

        tracing::debug!(entity_id = %state.entity_id, player_id = %player_id, "Resolved intent target");
        Ok(IntentTarget {
            entity_id: state.entity_id,
            player_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::host::{HostEntity, InMemoryEntityMatcher};
    use crate::domain::intent::{AREA_SLOT, NAME_SLOT};
    use crate::ports::HostState;

    fn bridged(entity_id: &str, name: &str, unique_id: &str) -> HostEntity {
        HostEntity::new(
            HostState::new(entity_id).with_attribute(ATTR_MASS_PLAYER_TYPE, "player"),
            name,
        )
        .with_unique_id(unique_id)
    }

    fn resolver(matcher: InMemoryEntityMatcher) -> IntentTargetResolver {
        let matcher = Arc::new(matcher);
        IntentTargetResolver::new(matcher.clone(), matcher)
    }

    #[tokio::test]
    async fn picks_bridged_player_by_name() {
        let matcher = InMemoryEntityMatcher::new()
            .with_entity(HostEntity::new(HostState::new("media_player.tv"), "Kitchen"))
            .with_entity(bridged("media_player.kitchen", "Kitchen", "mass_kitchen"));

        let target = resolver(matcher)
            .resolve(&IntentSlots::new().with(NAME_SLOT, "Kitchen"))
            .await
            .unwrap();

        assert_eq!(target.entity_id, "media_player.kitchen");
        assert_eq!(target.player_id.as_str(), "kitchen");
    }

    #[tokio::test]
    async fn no_constraints_never_reaches_matcher() {
        let matcher = InMemoryEntityMatcher::new()
            .with_entity(bridged("media_player.kitchen", "Kitchen", "mass_kitchen"));
        let probe = matcher.clone();

        let result = resolver(matcher)
            .resolve(&IntentSlots::new().with(NAME_SLOT, "all"))
            .await;

        assert!(matches!(result, Err(IntentError::CannotTargetAll)));
        assert_eq!(probe.match_calls(), 0);
    }

    #[tokio::test]
    async fn only_foreign_players_is_match_failure() {
        let matcher = InMemoryEntityMatcher::new()
            .with_entity(HostEntity::new(HostState::new("media_player.tv"), "TV").in_area("Den"));

        let result = resolver(matcher)
            .resolve(&IntentSlots::new().with(AREA_SLOT, "Den"))
            .await;

        assert!(matches!(result, Err(IntentError::MatchFailed { .. })));
    }

    #[tokio::test]
    async fn foreign_unique_id_is_no_target() {
        let matcher = InMemoryEntityMatcher::new()
            .with_entity(bridged("media_player.kitchen", "Kitchen", "sonos_kitchen"));

        let err = resolver(matcher)
            .resolve(&IntentSlots::new().with(NAME_SLOT, "Kitchen"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "No entities matched for: name=Some(\"Kitchen\"), area_name=None"
        );
    }
}
