//! Chat messages and the optimistic-update identity model.
//!
//! A message inserted locally before the persistence call confirms it
//! carries a `Pending` id; once the care service assigns an authoritative
//! id the message is replaced in place (matched on the local id, never on
//! array position) and becomes `Committed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Identity
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Message identity: locally minted until the server confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageId {
    /// Optimistic insert awaiting persistence.
    Pending(Uuid),
    /// Persisted by the care service under this id.
    Committed(i64),
}

impl MessageId {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a dog's conversation history.
///
/// `evidence` exists only in memory: it is attached client-side after the
/// persistence call returns and is never part of the wire payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub dog_id: i64,
    pub role: Role,
    pub content: String,
    /// Which specialist produced the answer; `None` for user messages.
    pub agent: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl ChatMessage {
    /// Build an optimistic user message with a freshly minted local id.
    pub fn pending_user(dog_id: i64, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::Pending(Uuid::new_v4()),
            dog_id,
            role: Role::User,
            content: content.into(),
            agent: None,
            created_at: Utc::now(),
            evidence: Vec::new(),
        }
    }
}

/// One retrieval citation backing an agent answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub source: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub snippet: String,
}
