//! Engagement scheduler against a scripted gateway: outstanding-question
//! and idle guards, the forced variant, and the answer flow.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use pt_api::{CareGateway, NewMessage};
use pt_chat::{ActivityStore, ConversationState, EngagementScheduler};
use pt_domain::agent::AgentFanout;
use pt_domain::dog::Dog;
use pt_domain::error::{Error, Result};
use pt_domain::message::ChatMessage;
use pt_domain::profile::{AutoFillUpdate, InfoCategory, ProactiveQuestion, QuestionType, ReportInfo};

#[derive(Default)]
struct QuestionGateway {
    question: Mutex<Option<ProactiveQuestion>>,
    fetch_fails: Mutex<bool>,
    fetches: Mutex<usize>,
    saved: Mutex<Vec<(i64, String, String, String)>>,
}

fn question(key: &str) -> ProactiveQuestion {
    ProactiveQuestion {
        category: InfoCategory::Behavior,
        key: key.into(),
        question: "Does she pull on the leash?".into(),
        question_type: QuestionType::Boolean,
    }
}

#[async_trait]
impl CareGateway for QuestionGateway {
    async fn list_dogs(&self, _user_id: i64) -> Result<Vec<Dog>> {
        Ok(Vec::new())
    }

    async fn list_messages(&self, _dog_id: i64, _limit: u32) -> Result<Vec<ChatMessage>> {
        Ok(Vec::new())
    }

    async fn post_message(&self, _dog_id: i64, _message: NewMessage) -> Result<ChatMessage> {
        unreachable!("scheduler never posts chat messages")
    }

    async fn query_agents(&self, _message: &str, _dog_id: i64) -> Result<AgentFanout> {
        unreachable!("scheduler never fans out")
    }

    async fn auto_fill_from_history(&self, _dog_id: i64) -> Result<Vec<AutoFillUpdate>> {
        Ok(Vec::new())
    }

    async fn random_unanswered_question(
        &self,
        _dog_id: i64,
    ) -> Result<Option<ProactiveQuestion>> {
        *self.fetches.lock() += 1;
        if *self.fetch_fails.lock() {
            return Err(Error::Http("connection refused".into()));
        }
        Ok(self.question.lock().clone())
    }

    async fn save_profile_answer(
        &self,
        dog_id: i64,
        key: &str,
        answer: &str,
        source: &str,
    ) -> Result<()> {
        self.saved
            .lock()
            .push((dog_id, key.to_owned(), answer.to_owned(), source.to_owned()));
        Ok(())
    }

    async fn create_report(&self, _dog_id: i64) -> Result<ReportInfo> {
        unreachable!("scheduler never creates reports")
    }
}

fn harness(
    gateway: Arc<QuestionGateway>,
    dir: &tempfile::TempDir,
    idle_minutes: u32,
) -> (Arc<ConversationState>, Arc<ActivityStore>, EngagementScheduler) {
    let state = Arc::new(ConversationState::new());
    let activity = Arc::new(ActivityStore::new(dir.path()).unwrap());
    let scheduler =
        EngagementScheduler::new(gateway, state.clone(), activity.clone(), idle_minutes);
    (state, activity, scheduler)
}

#[tokio::test]
async fn idle_dog_with_no_record_gets_a_question() {
    let gateway = Arc::new(QuestionGateway::default());
    *gateway.question.lock() = Some(question("leash_pulling"));
    let dir = tempfile::tempdir().unwrap();
    let (state, _, scheduler) = harness(gateway, &dir, 30);

    scheduler.maybe_prompt(1).await;
    assert_eq!(
        state.proactive_question().map(|q| q.key),
        Some("leash_pulling".into())
    );
}

#[tokio::test]
async fn recent_activity_suppresses_the_prompt() {
    let gateway = Arc::new(QuestionGateway::default());
    *gateway.question.lock() = Some(question("leash_pulling"));
    let dir = tempfile::tempdir().unwrap();
    let (state, activity, scheduler) = harness(gateway.clone(), &dir, 30);

    activity.touch(1).unwrap();
    scheduler.maybe_prompt(1).await;

    assert!(state.proactive_question().is_none());
    assert_eq!(*gateway.fetches.lock(), 0);
}

#[tokio::test]
async fn outstanding_question_is_not_replaced() {
    let gateway = Arc::new(QuestionGateway::default());
    *gateway.question.lock() = Some(question("new_one"));
    let dir = tempfile::tempdir().unwrap();
    let (state, _, scheduler) = harness(gateway.clone(), &dir, 30);

    state.set_proactive_question(question("already_showing"));
    scheduler.maybe_prompt(1).await;

    assert_eq!(
        state.proactive_question().map(|q| q.key),
        Some("already_showing".into())
    );
    assert_eq!(*gateway.fetches.lock(), 0);
}

#[tokio::test]
async fn force_prompt_bypasses_both_guards() {
    let gateway = Arc::new(QuestionGateway::default());
    *gateway.question.lock() = Some(question("new_one"));
    let dir = tempfile::tempdir().unwrap();
    let (state, activity, scheduler) = harness(gateway, &dir, 30);

    activity.touch(1).unwrap();
    state.set_proactive_question(question("already_showing"));
    scheduler.force_prompt(1).await;

    assert_eq!(
        state.proactive_question().map(|q| q.key),
        Some("new_one".into())
    );
}

#[tokio::test]
async fn everything_answered_is_silent() {
    let gateway = Arc::new(QuestionGateway::default());
    let dir = tempfile::tempdir().unwrap();
    let (state, _, scheduler) = harness(gateway.clone(), &dir, 30);

    scheduler.maybe_prompt(1).await;
    assert!(state.proactive_question().is_none());
    assert_eq!(*gateway.fetches.lock(), 1);
}

#[tokio::test]
async fn fetch_failure_leaves_state_untouched() {
    let gateway = Arc::new(QuestionGateway::default());
    *gateway.fetch_fails.lock() = true;
    let dir = tempfile::tempdir().unwrap();
    let (state, _, scheduler) = harness(gateway, &dir, 30);

    scheduler.maybe_prompt(1).await;
    assert!(state.proactive_question().is_none());
    assert!(state.error().is_none());
}

#[tokio::test]
async fn answering_saves_profile_data_and_resets_idle() {
    let gateway = Arc::new(QuestionGateway::default());
    let dir = tempfile::tempdir().unwrap();
    let (state, activity, scheduler) = harness(gateway.clone(), &dir, 30);

    state.set_proactive_question(question("leash_pulling"));
    scheduler.answer(1, "leash_pulling", "yes").await.unwrap();

    let saved = gateway.saved.lock();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0], (1, "leash_pulling".into(), "yes".into(), "user".into()));
    drop(saved);

    assert!(state.proactive_question().is_none());
    assert!(activity.last_activity(1).is_some());
}
