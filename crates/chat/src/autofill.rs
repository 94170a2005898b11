//! Profile auto-fill trigger.
//!
//! Fires twice per send (before and after the fan-out) so the service can
//! extract structured profile facts from conversation history.  Purely a
//! side effect: never blocks or aborts the surrounding send, never
//! surfaces its own errors.

use std::sync::Arc;

use tracing::warn;

use pt_api::CareGateway;
use pt_domain::trace::TraceEvent;

use crate::state::ConversationState;

pub struct AutoFillTrigger {
    gateway: Arc<dyn CareGateway>,
    state: Arc<ConversationState>,
}

impl AutoFillTrigger {
    pub fn new(gateway: Arc<dyn CareGateway>, state: Arc<ConversationState>) -> Self {
        Self { gateway, state }
    }

    /// Run one extraction pass.  A non-empty result replaces the displayed
    /// batch; an empty result leaves it alone; errors are logged and
    /// swallowed.  `epoch` guards against writing into a conversation the
    /// user has already switched away from.
    pub async fn refresh(&self, dog_id: i64, epoch: u64) {
        match self.gateway.auto_fill_from_history(dog_id).await {
            Ok(updates) if !updates.is_empty() => {
                if self.state.epoch() != epoch {
                    return;
                }
                TraceEvent::AutoFillApplied {
                    dog_id,
                    updates: updates.len(),
                }
                .emit();
                self.state.set_autofill_updates(updates);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(dog_id, error = %e, "auto-fill extraction failed");
            }
        }
    }
}
