//! Wire DTOs for the care service's JSON API.
//!
//! Most domain types deserialize straight off the wire; only chat messages
//! need a separate DTO because the domain side carries the
//! `Pending`/`Committed` identity union and in-memory evidence.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use pt_domain::message::{ChatMessage, MessageId, Role};

/// `ChatMessageRead` — one persisted message as the service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageDto {
    pub id: i64,
    pub dog_id: i64,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessageDto> for ChatMessage {
    fn from(dto: ChatMessageDto) -> Self {
        ChatMessage {
            id: MessageId::Committed(dto.id),
            dog_id: dto.dog_id,
            role: dto.role,
            content: dto.content,
            agent: dto.agent,
            created_at: dto.created_at,
            evidence: Vec::new(),
        }
    }
}
