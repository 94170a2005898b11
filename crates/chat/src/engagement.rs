//! Engagement scheduler — surfaces a proactive profile question after a
//! period of conversational inactivity.
//!
//! The idle test is a pure function of the durable last-activity timestamp
//! so it can be evaluated opportunistically from any lifecycle point.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use pt_api::CareGateway;
use pt_domain::error::Result;
use pt_domain::trace::TraceEvent;

use crate::activity::ActivityStore;
use crate::state::ConversationState;

pub struct EngagementScheduler {
    gateway: Arc<dyn CareGateway>,
    state: Arc<ConversationState>,
    activity: Arc<ActivityStore>,
    idle_minutes: u32,
}

impl EngagementScheduler {
    pub fn new(
        gateway: Arc<dyn CareGateway>,
        state: Arc<ConversationState>,
        activity: Arc<ActivityStore>,
        idle_minutes: u32,
    ) -> Self {
        Self {
            gateway,
            state,
            activity,
            idle_minutes,
        }
    }

    /// Fetch a proactive question if enough idle time has elapsed and none
    /// is currently outstanding.  "No questions remaining" is an expected,
    /// silent outcome; any other fetch failure is logged and ignored.
    pub async fn maybe_prompt(&self, dog_id: i64) {
        if self.state.proactive_question().is_some() {
            return;
        }
        let last = self.activity.last_activity(dog_id);
        if !idle_elapsed(last, Utc::now(), self.idle_minutes) {
            return;
        }
        self.fetch(dog_id).await;
    }

    /// Manually triggered variant: bypasses the idle check and fetches
    /// unconditionally, replacing any outstanding question.
    pub async fn force_prompt(&self, dog_id: i64) {
        self.fetch(dog_id).await;
    }

    async fn fetch(&self, dog_id: i64) {
        match self.gateway.random_unanswered_question(dog_id).await {
            Ok(Some(question)) => {
                TraceEvent::ProactiveQuestionFetched {
                    dog_id,
                    key: question.key.clone(),
                }
                .emit();
                self.state.set_proactive_question(question);
            }
            // Every question answered — nothing to surface.
            Ok(None) => {}
            Err(e) => {
                warn!(dog_id, error = %e, "proactive question fetch failed");
            }
        }
    }

    /// Persist the answer as profile data (not as a chat message), clear
    /// the outstanding question, and refresh the activity timestamp.
    pub async fn answer(&self, dog_id: i64, key: &str, answer: &str) -> Result<()> {
        self.gateway
            .save_profile_answer(dog_id, key, answer, "user")
            .await?;

        self.state.clear_proactive_question();
        if let Err(e) = self.activity.touch(dog_id) {
            warn!(dog_id, error = %e, "activity timestamp write failed");
        }

        TraceEvent::ProactiveQuestionAnswered {
            dog_id,
            key: key.to_owned(),
        }
        .emit();
        Ok(())
    }
}

/// Whether enough idle time has passed since `last` to prompt.  A dog with
/// no recorded activity counts as idle.
fn idle_elapsed(last: Option<DateTime<Utc>>, now: DateTime<Utc>, idle_minutes: u32) -> bool {
    match last {
        None => true,
        Some(t) => now.signed_duration_since(t).num_minutes() >= idle_minutes as i64,
    }
}
