//! Send orchestrator — drives the full lifecycle of one outgoing message:
//! optimistic insert → persist → fan-out query → paced progressive reveal
//! → per-answer persistence → side effects → terminal cleanup or rollback.
//!
//! Failure containment: user-message persistence is the only failure that
//! rolls visible state back (the optimistic message disappears).  Every
//! later failure is additive-safe — it degrades the experience but never
//! deletes already-committed state.  Primary-path failures land in the
//! container's error field; secondary ones are logged and swallowed.

use std::sync::Arc;

use tracing::warn;

use pt_api::{CareGateway, NewMessage};
use pt_domain::dog::Dog;
use pt_domain::error::{Error, Result};
use pt_domain::message::{ChatMessage, MessageId};
use pt_domain::profile::ReportInfo;
use pt_domain::trace::TraceEvent;

use crate::activity::ActivityStore;
use crate::autofill::AutoFillTrigger;
use crate::pacing::PacingPolicy;
use crate::state::{ConversationState, Phase};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Outcome
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How one `send` invocation ended.  `Failed` means the error field was
/// set; nothing propagates to the caller as an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Completed,
    /// Another send is already in flight; state was not touched.
    Busy,
    /// The user switched dogs mid-flight; the send aborted silently.
    Superseded,
    Failed,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SendOrchestrator {
    gateway: Arc<dyn CareGateway>,
    state: Arc<ConversationState>,
    autofill: AutoFillTrigger,
    activity: Arc<ActivityStore>,
    pacing: PacingPolicy,
    history_limit: u32,
}

impl SendOrchestrator {
    pub fn new(
        gateway: Arc<dyn CareGateway>,
        state: Arc<ConversationState>,
        activity: Arc<ActivityStore>,
        pacing: PacingPolicy,
        history_limit: u32,
    ) -> Self {
        let autofill = AutoFillTrigger::new(gateway.clone(), state.clone());
        Self {
            gateway,
            state,
            autofill,
            activity,
            pacing,
            history_limit,
        }
    }

    // ── conversation setup ───────────────────────────────────────────

    /// Load the user's dogs into the container.
    pub async fn load_dogs(&self, user_id: i64) -> Result<Vec<Dog>> {
        let dogs = self.gateway.list_dogs(user_id).await?;
        self.state.set_dogs(dogs.clone());
        Ok(dogs)
    }

    /// Select a dog and load its history fresh.  Does not cancel an
    /// in-flight send for the previous dog — the epoch bump makes that
    /// send abort at its next checkpoint instead.
    pub async fn switch_dog(&self, dog_id: i64) -> Result<()> {
        if !self.state.dogs().iter().any(|d| d.id == dog_id) {
            return Err(Error::Other(format!("unknown dog id {dog_id}")));
        }
        let epoch = self.state.select_dog(dog_id);

        match self.gateway.list_messages(dog_id, self.history_limit).await {
            Ok(history) => {
                if self.state.epoch() == epoch {
                    TraceEvent::ConversationSwitched {
                        dog_id,
                        epoch,
                        history_len: history.len(),
                    }
                    .emit();
                    self.state.set_history(history);
                }
            }
            Err(e) => {
                if self.state.epoch() == epoch {
                    self.state.set_error(e.to_string());
                }
            }
        }
        Ok(())
    }

    /// Generate a health report — a post-hoc action over the last
    /// answered batch.
    pub async fn generate_report(&self) -> Result<ReportInfo> {
        let dog_id = self.state.selected_dog_id().ok_or(Error::NoDogSelected)?;
        self.gateway.create_report(dog_id).await
    }

    // ── the send protocol ────────────────────────────────────────────

    /// Run one send.  Single-flight: callers get `Busy` while a send is in
    /// progress instead of racing an interleaved second protocol run.
    pub async fn send(&self, content: &str) -> SendOutcome {
        let content = content.trim();
        let Some(dog_id) = self.state.selected_dog_id() else {
            self.state.set_error(Error::NoDogSelected.to_string());
            return SendOutcome::Failed;
        };
        if content.is_empty() {
            self.state.set_error(Error::EmptyMessage.to_string());
            return SendOutcome::Failed;
        }
        if self.state.phase() != Phase::None {
            return SendOutcome::Busy;
        }

        let epoch = self.state.epoch();
        TraceEvent::SendStarted { dog_id }.emit();

        // Step 1: clear the previous auto-fill batch and any outstanding
        // profile question, insert the optimistic user message, enter
        // `analyzing`.
        self.state.clear_autofill_updates();
        self.state.clear_proactive_question();
        self.state.clear_error();
        let optimistic = ChatMessage::pending_user(dog_id, content);
        let MessageId::Pending(local_id) = optimistic.id else {
            unreachable!("pending_user mints a local id")
        };
        self.state.push_message(optimistic);
        self.state.set_phase(Phase::Analyzing);

        // Step 2: persist the user message.  This is the only failure
        // with a visible rollback: the optimistic entry disappears.
        match self
            .gateway
            .post_message(dog_id, NewMessage::user(content))
            .await
        {
            Ok(committed) => {
                if self.stale(epoch, dog_id, "persist-user") {
                    return SendOutcome::Superseded;
                }
                self.state.commit_message(local_id, committed);
            }
            Err(e) => {
                if self.stale(epoch, dog_id, "persist-user") {
                    return SendOutcome::Superseded;
                }
                self.state.remove_pending(local_id);
                return self.fail(dog_id, "persist-user", e);
            }
        }

        // Step 3: pre-fan-out auto-fill.  Never aborts the send.
        self.autofill.refresh(dog_id, epoch).await;

        // Step 4: hold `analyzing` for its dwell floor.
        tokio::time::sleep(self.pacing.dwell(Phase::Analyzing)).await;
        if self.stale(epoch, dog_id, "analyzing") {
            return SendOutcome::Superseded;
        }

        // Step 5: fan out.  On failure the persisted user message
        // survives; only the error field and phase change.
        let fanout = match self.gateway.query_agents(content, dog_id).await {
            Ok(f) => f,
            Err(e) => {
                if self.stale(epoch, dog_id, "fan-out") {
                    return SendOutcome::Superseded;
                }
                return self.fail(dog_id, "fan-out", e);
            }
        };
        if self.stale(epoch, dog_id, "fan-out") {
            return SendOutcome::Superseded;
        }

        // Step 6: the active set is fixed at fan-out response time.
        self.state.begin_fanout(fanout.agent_ids());
        self.state.set_phase(Phase::Routing);
        tokio::time::sleep(self.pacing.dwell(Phase::Routing)).await;
        if self.stale(epoch, dog_id, "routing") {
            return SendOutcome::Superseded;
        }

        // Step 7: paced reveal, one agent at a time in result order; the
        // full result list is available for display immediately.
        self.state.set_phase(Phase::Responding);
        self.state.set_pending_results(fanout.results.clone());
        for result in &fanout.results {
            tokio::time::sleep(self.pacing.reveal).await;
            if self.stale(epoch, dog_id, "responding") {
                return SendOutcome::Superseded;
            }
            self.state.mark_agent_completed(&result.agent);
        }

        // Step 8: persist each answer sequentially, in result order.
        // Per-result failures skip that answer and continue; no retry.
        let mut persisted = 0usize;
        for result in &fanout.results {
            match self
                .gateway
                .post_message(dog_id, NewMessage::assistant(&result.answer, &result.agent))
                .await
            {
                Ok(mut message) => {
                    if self.stale(epoch, dog_id, "persist-answers") {
                        return SendOutcome::Superseded;
                    }
                    // Evidence is attached client-side only; it is not
                    // part of the persistence payload.
                    message.evidence = result.sources.clone();
                    self.state.push_message(message);
                    persisted += 1;
                }
                Err(e) => {
                    warn!(
                        dog_id,
                        agent = %result.agent,
                        error = %e,
                        "agent answer persistence failed, skipping"
                    );
                }
            }
        }
        if self.stale(epoch, dog_id, "persist-answers") {
            return SendOutcome::Superseded;
        }

        // Step 9: post-fan-out side effects, then terminal cleanup.
        // Pending results deliberately survive for post-hoc actions.
        self.autofill.refresh(dog_id, epoch).await;
        if let Err(e) = self.activity.touch(dog_id) {
            warn!(dog_id, error = %e, "activity timestamp write failed");
        }
        if self.stale(epoch, dog_id, "finalize") {
            return SendOutcome::Superseded;
        }
        self.state.finish_send();

        TraceEvent::SendCompleted {
            dog_id,
            agents_answered: fanout.results.len(),
            messages_persisted: persisted,
        }
        .emit();
        SendOutcome::Completed
    }

    // ── helpers ──────────────────────────────────────────────────────

    /// Epoch checkpoint: true when the user switched dogs since this send
    /// started.  The new conversation's state was reset by the switch, so
    /// the stale send must not touch anything.
    fn stale(&self, epoch: u64, dog_id: i64, stage: &str) -> bool {
        if self.state.epoch() == epoch {
            return false;
        }
        TraceEvent::SendSuperseded {
            dog_id,
            stage: stage.to_owned(),
        }
        .emit();
        true
    }

    /// Primary-path failure: record the error, restore the terminal
    /// phase invariant, and stop the protocol.
    fn fail(&self, dog_id: i64, stage: &str, error: Error) -> SendOutcome {
        TraceEvent::SendFailed {
            dog_id,
            stage: stage.to_owned(),
            error: error.to_string(),
        }
        .emit();
        self.state.set_error(error.to_string());
        self.state.finish_send();
        SendOutcome::Failed
    }
}
