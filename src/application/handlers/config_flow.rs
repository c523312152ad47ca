//! ConfigFlow - connection setup and reconciliation of one server.
//!
//! A flow decides whether an incoming server identity is a new record, an
//! update of an existing one or a duplicate. Each flow instance runs its
//! steps strictly in order; several flows may interleave, so after every
//! suspension point the flow re-checks with the registry that nobody
//! aborted it in the meantime.
//!
//! Reconciliation rules:
//! - discovery of a known server only updates its URL (with one reload)
//!   when the URL changed, then aborts as `already_configured`
//! - the first flow to reach `Resolved` creates the record and aborts
//!   every other in-progress flow; later flows degrade to an in-place
//!   update reported as `reconfiguration_successful`

use std::sync::Arc;

use crate::config::FlowConfig;
use crate::domain::flow::{
    AbortReason, FieldKind, FlowError, FlowInput, FlowResult, FlowStep, FormError, FormField,
    FormView, FIELD_URL,
};
use crate::domain::foundation::{FlowId, StateMachine};
use crate::domain::integration::{IntegrationOptions, IntegrationRecord, NewIntegrationRecord, RecordUpdate};
use crate::domain::server::{DiscoveryError, DiscoveryInfo, ServerIdentity};
use crate::ports::{ConfigEntryStore, FlowRegistry, UniqueIdClaim};

use super::ServerInfoResolver;

/// Collaborators shared by every setup flow of the integration.
pub struct FlowContext {
    pub resolver: Arc<ServerInfoResolver>,
    pub entries: Arc<dyn ConfigEntryStore>,
    pub flows: Arc<dyn FlowRegistry>,
    pub settings: FlowConfig,
}

impl FlowContext {
    pub fn new(
        resolver: Arc<ServerInfoResolver>,
        entries: Arc<dyn ConfigEntryStore>,
        flows: Arc<dyn FlowRegistry>,
        settings: FlowConfig,
    ) -> Self {
        Self {
            resolver,
            entries,
            flows,
            settings,
        }
    }
}

/// One connection-setup flow.
pub struct ConfigFlow {
    id: FlowId,
    step: FlowStep,
    identity: Option<ServerIdentity>,
    ctx: Arc<FlowContext>,
}

impl ConfigFlow {
    /// Registers a new flow with the host.
    pub async fn start(ctx: Arc<FlowContext>) -> Result<Self, FlowError> {
        let id = FlowId::new();
        ctx.flows.begin(id).await?;
        tracing::debug!(flow_id = %id, "Setup flow started");

        Ok(Self {
            id,
            step: FlowStep::Start,
            identity: None,
            ctx,
        })
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    /// Server this flow is about, once known.
    pub fn identity(&self) -> Option<&ServerIdentity> {
        self.identity.as_ref()
    }

    /// Feeds one input to the flow.
    ///
    /// # Errors
    ///
    /// - `UnknownFlow` if the flow was aborted or already finished
    /// - `InvalidTransition` if the input does not fit the current step
    /// - `Store` if a host port failed
    pub async fn handle(&mut self, input: FlowInput) -> Result<FlowResult, FlowError> {
        self.ensure_active().await?;

        match (self.step, input) {
            (FlowStep::Start, FlowInput::User) => {
                self.advance(FlowStep::AwaitingInput, "user")?;
                Ok(self.manual_form(&self.ctx.settings.default_url, None))
            }
            (FlowStep::Start, FlowInput::SubmitUrl { url }) => {
                self.advance(FlowStep::AwaitingInput, "submit_url")?;
                self.submit_url(url).await
            }
            (FlowStep::AwaitingInput, FlowInput::SubmitUrl { url }) => self.submit_url(url).await,
            (FlowStep::Start, FlowInput::Discovered(info)) => self.discovered(info).await,
            (FlowStep::DiscoveryConfirm, FlowInput::Confirm) => self.confirm().await,
            (step, input) => Err(FlowError::InvalidTransition {
                step,
                input: input.name(),
            }),
        }
    }

    async fn submit_url(&mut self, url: String) -> Result<FlowResult, FlowError> {
        let resolved = self.ctx.resolver.resolve(&url).await;
        self.ensure_active().await?;

        match resolved {
            Ok(identity) => self.finalize(identity, "submit_url").await,
            Err(err) => {
                tracing::debug!(flow_id = %self.id, url = %url, error = %err, "Manual setup failed");
                self.advance(FlowStep::AwaitingInput, "submit_url")?;
                Ok(self.manual_form(&url, Some(FormError::from(&err))))
            }
        }
    }

    async fn discovered(&mut self, info: DiscoveryInfo) -> Result<FlowResult, FlowError> {
        let (server_id, base_url) = match info.announced_server() {
            Ok(announced) => announced,
            Err(err) => return self.drop_discovery(&info, err).await,
        };

        let existing = self.ctx.entries.find_by_unique_id(&server_id).await?;
        self.ensure_active().await?;

        if let Some(existing) = existing {
            if existing.base_url != base_url {
                self.ctx
                    .entries
                    .update(&existing.entry_id, RecordUpdate::base_url(&base_url))
                    .await?;
                self.ctx.entries.reload(&existing.entry_id).await?;
                tracing::info!(
                    server_id = %server_id,
                    old_url = %existing.base_url,
                    new_url = %base_url,
                    "Rediscovered server at a new address"
                );
            }
            return self.abort(AbortReason::AlreadyConfigured, "discovered").await;
        }

        // Optional properties only matter for servers we are about to add.
        let identity = match info.server_identity() {
            Ok(identity) => identity,
            Err(err) => return self.drop_discovery(&info, err).await,
        };

        let claim = self
            .ctx
            .flows
            .set_unique_id(self.id, &identity.server_id, true)
            .await?;
        self.ensure_active().await?;

        if claim == UniqueIdClaim::InProgressElsewhere {
            return self.abort(AbortReason::AlreadyInProgress, "discovered").await;
        }

        self.advance(FlowStep::DiscoveryConfirm, "discovered")?;
        let form = FormView::new(FlowStep::DiscoveryConfirm.step_id())
            .with_placeholder(FIELD_URL, identity.base_url.clone());
        self.identity = Some(identity);
        Ok(FlowResult::Form(form))
    }

    async fn drop_discovery(
        &mut self,
        info: &DiscoveryInfo,
        err: DiscoveryError,
    ) -> Result<FlowResult, FlowError> {
        tracing::debug!(
            flow_id = %self.id,
            hostname = ?info.hostname,
            error = %err,
            "Ignoring malformed discovery payload"
        );
        self.abort(AbortReason::InvalidDiscoveryInfo, "discovered").await
    }

    async fn confirm(&mut self) -> Result<FlowResult, FlowError> {
        let Some(identity) = self.identity.clone() else {
            return Err(FlowError::InvalidTransition {
                step: self.step,
                input: "confirm",
            });
        };

        // Liveness check only; the announced identity is kept.
        let resolved = self.ctx.resolver.resolve(&identity.base_url).await;
        self.ensure_active().await?;

        match resolved {
            Ok(_) => self.finalize(identity, "confirm").await,
            Err(err) => {
                tracing::debug!(
                    flow_id = %self.id,
                    server_id = %identity.server_id,
                    error = %err,
                    "Discovered server failed confirmation"
                );
                self.abort(AbortReason::from(&err), "confirm").await
            }
        }
    }

    async fn finalize(
        &mut self,
        identity: ServerIdentity,
        input: &'static str,
    ) -> Result<FlowResult, FlowError> {
        self.advance(FlowStep::Resolved, input)?;
        self.identity = Some(identity.clone());

        self.ctx
            .flows
            .set_unique_id(self.id, &identity.server_id, false)
            .await?;
        self.ensure_active().await?;

        let existing = self.ctx.entries.find_by_unique_id(&identity.server_id).await?;
        self.ensure_active().await?;
        if let Some(existing) = existing {
            return self.reconfigure(existing, &identity).await;
        }

        // Only one fresh registration may proceed.
        for other in self.ctx.flows.in_progress().await? {
            if other != self.id {
                self.ctx.flows.abort(other).await?;
                tracing::debug!(flow_id = %self.id, aborted = %other, "Aborted competing flow");
            }
        }
        self.ensure_active().await?;

        let new_record = NewIntegrationRecord {
            unique_id: identity.server_id.clone(),
            title: self.ctx.settings.default_title.clone(),
            base_url: identity.base_url.clone(),
            options: IntegrationOptions::default(),
        };

        match self.ctx.entries.create(new_record).await {
            Ok(record) => {
                self.advance(FlowStep::Created, "finalize")?;
                self.ctx.flows.finish(self.id).await?;
                tracing::info!(
                    entry_id = %record.entry_id,
                    server_id = %record.unique_id,
                    url = %record.base_url,
                    "Created integration record"
                );
                Ok(FlowResult::CreateEntry(record))
            }
            Err(err) if err.is_conflict() => {
                // Lost the race between the lookup and the create.
                match self.ctx.entries.find_by_unique_id(&identity.server_id).await? {
                    Some(existing) => self.reconfigure(existing, &identity).await,
                    None => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn reconfigure(
        &mut self,
        existing: IntegrationRecord,
        identity: &ServerIdentity,
    ) -> Result<FlowResult, FlowError> {
        let update = RecordUpdate::base_url(&identity.base_url)
            .with_title(self.ctx.settings.default_title.clone());
        self.ctx.entries.update(&existing.entry_id, update).await?;
        self.ctx.entries.reload(&existing.entry_id).await?;

        tracing::info!(
            entry_id = %existing.entry_id,
            server_id = %identity.server_id,
            url = %identity.base_url,
            "Reconfigured existing integration record"
        );
        self.abort(AbortReason::ReconfigurationSuccessful, "finalize")
            .await
    }

    async fn abort(
        &mut self,
        reason: AbortReason,
        input: &'static str,
    ) -> Result<FlowResult, FlowError> {
        self.advance(FlowStep::Aborted, input)?;
        self.ctx.flows.finish(self.id).await?;
        tracing::debug!(flow_id = %self.id, reason = reason.as_str(), "Setup flow aborted");
        Ok(FlowResult::abort(reason))
    }

    fn manual_form(&self, url: &str, error: Option<FormError>) -> FlowResult {
        let mut form = FormView::new(FlowStep::AwaitingInput.step_id())
            .with_field(FormField::required(FIELD_URL, FieldKind::Url).with_default(url));
        if let Some(error) = error {
            form = form.with_error(error);
        }
        FlowResult::Form(form)
    }

    fn advance(&mut self, next: FlowStep, input: &'static str) -> Result<(), FlowError> {
        self.step = self
            .step
            .transition_to(next)
            .map_err(|_| FlowError::InvalidTransition {
                step: self.step,
                input,
            })?;
        Ok(())
    }

    async fn ensure_active(&mut self) -> Result<(), FlowError> {
        if self.step.is_terminal() || !self.ctx.flows.is_active(self.id).await? {
            if !self.step.is_terminal() {
                self.step = FlowStep::Aborted;
            }
            return Err(FlowError::UnknownFlow(self.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::host::{InMemoryConfigEntryStore, InMemoryFlowRegistry};
    use crate::adapters::mass::MockServerConnector;
    use crate::domain::foundation::ServerId;
    use crate::ports::ConnectError;

    struct Harness {
        ctx: Arc<FlowContext>,
        entries: InMemoryConfigEntryStore,
        flows: InMemoryFlowRegistry,
        connector: MockServerConnector,
    }

    fn harness(connector: MockServerConnector) -> Harness {
        let entries = InMemoryConfigEntryStore::new();
        let flows = InMemoryFlowRegistry::new();
        let ctx = Arc::new(FlowContext::new(
            Arc::new(ServerInfoResolver::new(Arc::new(connector.clone()))),
            Arc::new(entries.clone()),
            Arc::new(flows.clone()),
            FlowConfig::default(),
        ));
        Harness {
            ctx,
            entries,
            flows,
            connector,
        }
    }

    fn discovery(server_id: &str, url: &str) -> FlowInput {
        FlowInput::Discovered(
            DiscoveryInfo::default()
                .with_property("server_id", server_id)
                .with_property("base_url", url),
        )
    }

    #[tokio::test]
    async fn user_step_shows_form_with_default_url() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let result = flow.handle(FlowInput::User).await.unwrap();

        let form = result.form().unwrap();
        assert_eq!(form.step_id, "manual");
        assert_eq!(form.default_url(), Some("http://mass.local:8095"));
        assert_eq!(form.error, None);
        assert_eq!(flow.step(), FlowStep::AwaitingInput);
        assert_eq!(h.connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn failed_connect_keeps_submitted_url() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();
        flow.handle(FlowInput::User).await.unwrap();

        let result = flow
            .handle(FlowInput::SubmitUrl {
                url: "http://bad:8095".into(),
            })
            .await
            .unwrap();

        let form = result.form().unwrap();
        assert_eq!(form.error, Some(FormError::CannotConnect));
        assert_eq!(form.default_url(), Some("http://bad:8095"));
        assert_eq!(flow.step(), FlowStep::AwaitingInput);
    }

    #[tokio::test]
    async fn version_error_is_tagged_on_form() {
        let h = harness(MockServerConnector::new().with_failure(
            "http://old:8095",
            ConnectError::InvalidServerVersion("schema 20".into()),
        ));
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();
        flow.handle(FlowInput::User).await.unwrap();

        let result = flow
            .handle(FlowInput::SubmitUrl {
                url: "http://old:8095".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            result.form().unwrap().error,
            Some(FormError::InvalidServerVersion)
        );
    }

    #[tokio::test]
    async fn manual_success_creates_record() {
        let h = harness(MockServerConnector::new().with_server("http://h1:8095", "1234"));
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();
        flow.handle(FlowInput::User).await.unwrap();

        let result = flow
            .handle(FlowInput::SubmitUrl {
                url: "http://h1:8095".into(),
            })
            .await
            .unwrap();

        let FlowResult::CreateEntry(record) = result else {
            panic!("expected a created record, got {:?}", result);
        };
        assert_eq!(record.unique_id.as_str(), "1234");
        assert_eq!(record.base_url, "http://h1:8095");
        assert_eq!(record.title, "Music Assistant");
        assert_eq!(flow.step(), FlowStep::Created);
        assert_eq!(h.flows.finished().await, vec![flow.id()]);
    }

    #[tokio::test]
    async fn discovery_skips_resolver_until_confirm() {
        let h = harness(MockServerConnector::new().with_server("http://h1:8095", "1234"));
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let result = flow.handle(discovery("1234", "http://h1:8095")).await.unwrap();

        let form = result.form().unwrap();
        assert_eq!(form.step_id, "discovery_confirm");
        assert_eq!(form.placeholders.get("url").map(String::as_str), Some("http://h1:8095"));
        assert_eq!(h.connector.connect_count(), 0);

        let result = flow.handle(FlowInput::Confirm).await.unwrap();
        assert!(matches!(result, FlowResult::CreateEntry(_)));
        assert_eq!(h.connector.calls(), vec!["http://h1:8095".to_string()]);
    }

    #[tokio::test]
    async fn confirm_against_offline_server_aborts() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();
        flow.handle(discovery("1234", "http://h1:8095")).await.unwrap();

        let result = flow.handle(FlowInput::Confirm).await.unwrap();

        assert_eq!(result.abort_reason(), Some(AbortReason::CannotConnect));
        assert!(h.entries.is_empty().await);
    }

    #[tokio::test]
    async fn malformed_discovery_aborts_without_side_effects() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let info = DiscoveryInfo::default().with_property("base_url", "http://h1:8095");
        let result = flow.handle(FlowInput::Discovered(info)).await.unwrap();

        assert_eq!(result.abort_reason(), Some(AbortReason::InvalidDiscoveryInfo));
        assert!(h.entries.is_empty().await);
        assert_eq!(h.entries.total_reloads().await, 0);
    }

    #[tokio::test]
    async fn rediscovery_with_same_url_is_noop() {
        let h = harness(MockServerConnector::new());
        let record = h
            .entries
            .create(NewIntegrationRecord {
                unique_id: ServerId::new("1234").unwrap(),
                title: "Music Assistant".into(),
                base_url: "http://h1:8095".into(),
                options: IntegrationOptions::default(),
            })
            .await
            .unwrap();
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let result = flow.handle(discovery("1234", "http://h1:8095")).await.unwrap();

        assert_eq!(result.abort_reason(), Some(AbortReason::AlreadyConfigured));
        assert_eq!(h.entries.reload_count(&record.entry_id).await, 0);
        assert_eq!(h.entries.len().await, 1);
    }

    #[tokio::test]
    async fn known_server_moves_despite_garbled_optional_properties() {
        let h = harness(MockServerConnector::new());
        let record = h
            .entries
            .create(NewIntegrationRecord {
                unique_id: ServerId::new("1234").unwrap(),
                title: "Music Assistant".into(),
                base_url: "http://h1:8095".into(),
                options: IntegrationOptions::default(),
            })
            .await
            .unwrap();
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let result = flow
            .handle(FlowInput::Discovered(
                DiscoveryInfo::default()
                    .with_property("server_id", "1234")
                    .with_property("base_url", "http://h2:8095")
                    .with_property("schema_version", ""),
            ))
            .await
            .unwrap();

        assert_eq!(result.abort_reason(), Some(AbortReason::AlreadyConfigured));
        let moved = h.entries.get(&record.entry_id).await.unwrap().unwrap();
        assert_eq!(moved.base_url, "http://h2:8095");
        assert_eq!(h.entries.reload_count(&record.entry_id).await, 1);
    }

    #[tokio::test]
    async fn unknown_server_with_garbled_optional_properties_is_dropped() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let result = flow
            .handle(FlowInput::Discovered(
                DiscoveryInfo::default()
                    .with_property("server_id", "1234")
                    .with_property("base_url", "http://h2:8095")
                    .with_property("schema_version", "twenty"),
            ))
            .await
            .unwrap();

        assert_eq!(result.abort_reason(), Some(AbortReason::InvalidDiscoveryInfo));
        assert!(h.entries.is_empty().await);
    }

    #[tokio::test]
    async fn second_discovery_flow_for_same_server_is_in_progress() {
        let h = harness(MockServerConnector::new());
        let mut first = ConfigFlow::start(h.ctx.clone()).await.unwrap();
        let mut second = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        first.handle(discovery("1234", "http://h1:8095")).await.unwrap();
        let result = second.handle(discovery("1234", "http://h1:8095")).await.unwrap();

        assert_eq!(result.abort_reason(), Some(AbortReason::AlreadyInProgress));
        assert_eq!(first.step(), FlowStep::DiscoveryConfirm);
    }

    #[tokio::test]
    async fn input_out_of_order_is_rejected() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();

        let err = flow.handle(FlowInput::Confirm).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::InvalidTransition {
                step: FlowStep::Start,
                input: "confirm"
            }
        ));
    }

    #[tokio::test]
    async fn finished_flow_rejects_further_input() {
        let h = harness(MockServerConnector::new());
        let mut flow = ConfigFlow::start(h.ctx.clone()).await.unwrap();
        let info = DiscoveryInfo::default();
        flow.handle(FlowInput::Discovered(info)).await.unwrap();

        let err = flow.handle(FlowInput::User).await.unwrap_err();
        assert!(matches!(err, FlowError::UnknownFlow(id) if id == flow.id()));
    }
}
