//! Shared wiring for the CLI commands: one gateway client, one state
//! container, and the orchestrator and scheduler built on top of them.

use std::sync::Arc;

use pt_api::{CareGateway, RestCareClient};
use pt_chat::{
    ActivityStore, ConversationState, EngagementScheduler, PacingPolicy, SendOrchestrator,
};
use pt_domain::config::Config;

pub struct App {
    pub config: Config,
    pub state: Arc<ConversationState>,
    pub orchestrator: SendOrchestrator,
    pub scheduler: EngagementScheduler,
}

impl App {
    pub fn build(config: Config) -> anyhow::Result<Self> {
        let gateway: Arc<dyn CareGateway> = Arc::new(RestCareClient::new(&config.api)?);
        let state = Arc::new(ConversationState::new());
        let activity = Arc::new(ActivityStore::new(&config.state.state_path)?);
        tracing::debug!(base_url = %config.api.base_url, "care gateway client ready");

        let orchestrator = SendOrchestrator::new(
            gateway.clone(),
            state.clone(),
            activity.clone(),
            PacingPolicy::from_config(&config.pacing),
            config.api.history_limit,
        );
        let scheduler = EngagementScheduler::new(
            gateway,
            state.clone(),
            activity,
            config.engagement.idle_minutes,
        );

        Ok(Self {
            config,
            state,
            orchestrator,
            scheduler,
        })
    }
}
