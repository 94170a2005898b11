//! `CareGateway` — every remote operation the client consumes, behind one
//! async trait so the core can be driven by a test double.

use async_trait::async_trait;
use serde::Serialize;

use pt_domain::agent::AgentFanout;
use pt_domain::dog::Dog;
use pt_domain::error::Result;
use pt_domain::message::{ChatMessage, Role};
use pt_domain::profile::{AutoFillUpdate, ProactiveQuestion, ReportInfo};

/// Request body for persisting one chat message.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    /// Required by the service for assistant messages, absent for user ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            agent: None,
        }
    }

    pub fn assistant(content: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            agent: Some(agent.into()),
        }
    }
}

/// The care service surface consumed by the client.
///
/// Every method can fail; errors carry a human-readable message derived
/// from the response status or payload.
#[async_trait]
pub trait CareGateway: Send + Sync {
    /// List the dogs registered for a user.
    async fn list_dogs(&self, user_id: i64) -> Result<Vec<Dog>>;

    /// Load a dog's message history, oldest first.
    async fn list_messages(&self, dog_id: i64, limit: u32) -> Result<Vec<ChatMessage>>;

    /// Persist one message and return the authoritative record.
    async fn post_message(&self, dog_id: i64, message: NewMessage) -> Result<ChatMessage>;

    /// Fan a question out to the specialist agents.
    async fn query_agents(&self, message: &str, dog_id: i64) -> Result<AgentFanout>;

    /// Ask the service to extract profile facts from conversation history.
    async fn auto_fill_from_history(&self, dog_id: i64) -> Result<Vec<AutoFillUpdate>>;

    /// Fetch a random unanswered profile question.  `Ok(None)` means every
    /// question already has an answer — an expected outcome, not an error.
    async fn random_unanswered_question(&self, dog_id: i64)
        -> Result<Option<ProactiveQuestion>>;

    /// Persist a profile answer (not a chat message).
    async fn save_profile_answer(
        &self,
        dog_id: i64,
        key: &str,
        answer: &str,
        source: &str,
    ) -> Result<()>;

    /// Generate a markdown health report for a dog.
    async fn create_report(&self, dog_id: i64) -> Result<ReportInfo>;
}
