//! `ConversationState` — the single source of truth for the active dog's
//! conversation.
//!
//! Writer discipline: the orchestrator owns messages, phase, the agent
//! sets, pending results, and the error field; the engagement scheduler
//! owns the proactive question; the auto-fill trigger owns the auto-fill
//! batch.  The orchestrator additionally clears the question and the
//! batch when a send begins; no field has two value-producing writers.
//!
//! Each dog selection bumps an epoch counter.  An in-flight send captures
//! its epoch at start and re-checks it after every suspension point, so a
//! slow send for the previous dog aborts instead of mutating the new
//! conversation.

use parking_lot::RwLock;
use serde::Serialize;

use pt_domain::agent::AgentResult;
use pt_domain::dog::Dog;
use pt_domain::message::{ChatMessage, MessageId};
use pt_domain::profile::{AutoFillUpdate, ProactiveQuestion};
use uuid::Uuid;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Phase
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The progress phase of one in-flight send.  `None` is both the initial
/// and the terminal state of every send, success or failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    None,
    Analyzing,
    Routing,
    Responding,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Container
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
struct Inner {
    dogs: Vec<Dog>,
    selected: Option<i64>,
    epoch: u64,
    messages: Vec<ChatMessage>,
    phase: Phase,
    active_agents: Vec<String>,
    completed_agents: Vec<String>,
    /// `None` until the first fan-out; `Some(vec![])` when a fan-out
    /// returned zero results.  Deliberately survives send completion so
    /// post-hoc actions can reference the last batch.
    pending_results: Option<Vec<AgentResult>>,
    proactive_question: Option<ProactiveQuestion>,
    autofill_updates: Vec<AutoFillUpdate>,
    error: Option<String>,
}

/// Conversation state for one client instance.  Constructor-injected into
/// the orchestrator and schedulers; never a global.
#[derive(Default)]
pub struct ConversationState {
    inner: RwLock<Inner>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── reads ────────────────────────────────────────────────────────

    pub fn dogs(&self) -> Vec<Dog> {
        self.inner.read().dogs.clone()
    }

    pub fn selected_dog_id(&self) -> Option<i64> {
        self.inner.read().selected
    }

    /// The currently selected dog, resolved against the dog list.
    pub fn selected_dog(&self) -> Option<Dog> {
        let inner = self.inner.read();
        let id = inner.selected?;
        inner.dogs.iter().find(|d| d.id == id).cloned()
    }

    pub fn epoch(&self) -> u64 {
        self.inner.read().epoch
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.read().messages.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.read().phase
    }

    /// True while a send is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().phase != Phase::None
    }

    pub fn active_agents(&self) -> Vec<String> {
        self.inner.read().active_agents.clone()
    }

    pub fn completed_agents(&self) -> Vec<String> {
        self.inner.read().completed_agents.clone()
    }

    pub fn pending_results(&self) -> Option<Vec<AgentResult>> {
        self.inner.read().pending_results.clone()
    }

    pub fn proactive_question(&self) -> Option<ProactiveQuestion> {
        self.inner.read().proactive_question.clone()
    }

    pub fn autofill_updates(&self) -> Vec<AutoFillUpdate> {
        self.inner.read().autofill_updates.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    // ── dog selection ────────────────────────────────────────────────

    pub fn set_dogs(&self, dogs: Vec<Dog>) {
        self.inner.write().dogs = dogs;
    }

    /// Select a dog and reset all per-conversation state.  Bumps the epoch
    /// so in-flight sends for the previous dog abort; returns the new epoch.
    pub fn select_dog(&self, dog_id: i64) -> u64 {
        let mut inner = self.inner.write();
        inner.selected = Some(dog_id);
        inner.epoch += 1;
        inner.messages.clear();
        inner.phase = Phase::None;
        inner.active_agents.clear();
        inner.completed_agents.clear();
        inner.pending_results = None;
        inner.proactive_question = None;
        inner.autofill_updates.clear();
        inner.error = None;
        inner.epoch
    }

    /// Replace the message list with a freshly loaded history.
    pub fn set_history(&self, messages: Vec<ChatMessage>) {
        self.inner.write().messages = messages;
    }

    // ── message mutations (orchestrator only) ────────────────────────

    pub fn push_message(&self, message: ChatMessage) {
        self.inner.write().messages.push(message);
    }

    /// Replace the optimistic message carrying `local_id` with its
    /// persisted counterpart, in place.  Matched on the local id, not on
    /// array position.
    pub fn commit_message(&self, local_id: Uuid, committed: ChatMessage) {
        let mut inner = self.inner.write();
        if let Some(slot) = inner
            .messages
            .iter_mut()
            .find(|m| m.id == MessageId::Pending(local_id))
        {
            *slot = committed;
        }
    }

    /// Roll back an optimistic insert that failed to persist.
    pub fn remove_pending(&self, local_id: Uuid) {
        self.inner
            .write()
            .messages
            .retain(|m| m.id != MessageId::Pending(local_id));
    }

    // ── send progress (orchestrator only) ────────────────────────────

    pub fn set_phase(&self, phase: Phase) {
        self.inner.write().phase = phase;
    }

    /// Fix the active agent set at fan-out response time and reset the
    /// completed set.
    pub fn begin_fanout(&self, active: Vec<String>) {
        let mut inner = self.inner.write();
        inner.active_agents = active;
        inner.completed_agents.clear();
    }

    /// Reveal one agent.  `completed` stays a subset of `active` and only
    /// ever grows.
    pub fn mark_agent_completed(&self, agent: &str) {
        let mut inner = self.inner.write();
        if inner.active_agents.iter().any(|a| a == agent)
            && !inner.completed_agents.iter().any(|a| a == agent)
        {
            inner.completed_agents.push(agent.to_owned());
        }
    }

    /// Store the fan-out result list, superseding the previous batch.
    pub fn set_pending_results(&self, results: Vec<AgentResult>) {
        self.inner.write().pending_results = Some(results);
    }

    /// Terminal cleanup for a send: phase back to `None`, agent sets
    /// emptied.  Pending results survive deliberately.
    pub fn finish_send(&self) {
        let mut inner = self.inner.write();
        inner.phase = Phase::None;
        inner.active_agents.clear();
        inner.completed_agents.clear();
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.inner.write().error = Some(message.into());
    }

    pub fn clear_error(&self) {
        self.inner.write().error = None;
    }

    // ── proactive question (scheduler only) ──────────────────────────

    pub fn set_proactive_question(&self, question: ProactiveQuestion) {
        self.inner.write().proactive_question = Some(question);
    }

    pub fn clear_proactive_question(&self) {
        self.inner.write().proactive_question = None;
    }

    // ── auto-fill batch (trigger only) ───────────────────────────────

    /// Replace the displayed batch with the latest non-empty extraction.
    pub fn set_autofill_updates(&self, updates: Vec<AutoFillUpdate>) {
        self.inner.write().autofill_updates = updates;
    }

    pub fn clear_autofill_updates(&self) {
        self.inner.write().autofill_updates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_domain::message::Role;

    fn dog(id: i64, name: &str) -> Dog {
        Dog {
            id,
            name: name.into(),
            breed: None,
            birth_date: None,
            sex: Default::default(),
            neutered: false,
            weight_kg: None,
        }
    }

    #[test]
    fn select_dog_bumps_epoch_and_clears_conversation() {
        let state = ConversationState::new();
        state.set_dogs(vec![dog(1, "Mong"), dog(2, "Bori")]);

        let e1 = state.select_dog(1);
        state.push_message(ChatMessage::pending_user(1, "hello"));
        state.set_error("boom");
        state.set_pending_results(vec![]);

        let e2 = state.select_dog(2);
        assert!(e2 > e1);
        assert!(state.messages().is_empty());
        assert!(state.error().is_none());
        assert!(state.pending_results().is_none());
        assert_eq!(state.selected_dog().unwrap().name, "Bori");
    }

    #[test]
    fn commit_message_replaces_in_place() {
        let state = ConversationState::new();
        state.select_dog(1);

        let first = ChatMessage::pending_user(1, "first");
        let second = ChatMessage::pending_user(1, "second");
        let MessageId::Pending(local_id) = first.id else {
            unreachable!()
        };
        state.push_message(first);
        state.push_message(second);

        let committed = ChatMessage {
            id: MessageId::Committed(9),
            dog_id: 1,
            role: Role::User,
            content: "first".into(),
            agent: None,
            created_at: chrono::Utc::now(),
            evidence: Vec::new(),
        };
        state.commit_message(local_id, committed);

        let messages = state.messages();
        assert_eq!(messages[0].id, MessageId::Committed(9));
        assert!(messages[1].id.is_pending());
    }

    #[test]
    fn completed_stays_subset_of_active() {
        let state = ConversationState::new();
        state.begin_fanout(vec!["veterinarian".into(), "nutrition".into()]);

        state.mark_agent_completed("veterinarian");
        state.mark_agent_completed("veterinarian");
        state.mark_agent_completed("astrologer");

        assert_eq!(state.completed_agents(), vec!["veterinarian"]);
    }
}
