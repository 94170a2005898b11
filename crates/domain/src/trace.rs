use serde::Serialize;

/// Structured trace events emitted across all PawTalk crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    ApiCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    SendStarted {
        dog_id: i64,
    },
    SendCompleted {
        dog_id: i64,
        agents_answered: usize,
        messages_persisted: usize,
    },
    SendFailed {
        dog_id: i64,
        stage: String,
        error: String,
    },
    SendSuperseded {
        dog_id: i64,
        stage: String,
    },
    AutoFillApplied {
        dog_id: i64,
        updates: usize,
    },
    ProactiveQuestionFetched {
        dog_id: i64,
        key: String,
    },
    ProactiveQuestionAnswered {
        dog_id: i64,
        key: String,
    },
    ConversationSwitched {
        dog_id: i64,
        epoch: u64,
        history_len: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "pt_event");
    }
}
