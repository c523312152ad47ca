//! Steps of the connection-setup flow and their transition table.

use serde::Serialize;

use crate::domain::foundation::StateMachine;
use crate::domain::server::DiscoveryInfo;

/// Where a setup flow currently stands.
///
/// ```text
/// Start ──user──────────▶ AwaitingInput ◀─┐ (error, URL kept)
///   │                        │ ──────────┘
///   │                        ▼
///   ├──discovered──▶ DiscoveryConfirm ──confirm──▶ Resolved ──▶ Created
///   │                        │                        │
///   └────────────────────────┴────────────────────────┴──────▶ Aborted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Start,
    AwaitingInput,
    DiscoveryConfirm,
    Resolved,
    Created,
    Aborted,
}

impl FlowStep {
    /// Host-facing step identifier used for forms.
    pub fn step_id(&self) -> &'static str {
        match self {
            FlowStep::Start => "user",
            FlowStep::AwaitingInput => "manual",
            FlowStep::DiscoveryConfirm => "discovery_confirm",
            FlowStep::Resolved => "resolved",
            FlowStep::Created => "created",
            FlowStep::Aborted => "aborted",
        }
    }
}

impl StateMachine for FlowStep {
    fn valid_transitions(&self) -> &'static [Self] {
        use FlowStep::*;
        match self {
            Start => &[AwaitingInput, DiscoveryConfirm, Aborted],
            AwaitingInput => &[AwaitingInput, Resolved, Aborted],
            DiscoveryConfirm => &[Resolved, Aborted],
            Resolved => &[Created, Aborted],
            Created | Aborted => &[],
        }
    }
}

/// Inputs a flow reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowInput {
    /// User opened the setup dialog.
    User,
    /// User submitted the manual form.
    SubmitUrl { url: String },
    /// Zeroconf announced a server.
    Discovered(DiscoveryInfo),
    /// User confirmed a discovered server.
    Confirm,
}

impl FlowInput {
    pub fn name(&self) -> &'static str {
        match self {
            FlowInput::User => "user",
            FlowInput::SubmitUrl { .. } => "submit_url",
            FlowInput::Discovered(_) => "discovered",
            FlowInput::Confirm => "confirm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [FlowStep; 6] = [
        FlowStep::Start,
        FlowStep::AwaitingInput,
        FlowStep::DiscoveryConfirm,
        FlowStep::Resolved,
        FlowStep::Created,
        FlowStep::Aborted,
    ];

    #[test]
    fn created_and_aborted_are_terminal() {
        assert!(FlowStep::Created.is_terminal());
        assert!(FlowStep::Aborted.is_terminal());
    }

    #[test]
    fn every_live_step_can_abort() {
        for step in ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(step.can_transition_to(&FlowStep::Aborted), "{:?}", step);
        }
    }

    #[test]
    fn only_resolved_creates() {
        for step in ALL {
            assert_eq!(
                step.can_transition_to(&FlowStep::Created),
                step == FlowStep::Resolved
            );
        }
    }

    #[test]
    fn discovery_never_returns_to_manual_input() {
        assert!(!FlowStep::DiscoveryConfirm.can_transition_to(&FlowStep::AwaitingInput));
    }
}
