//! REST implementation of [`CareGateway`].
//!
//! `RestCareClient` wraps a `reqwest::Client` and translates every trait
//! method into the corresponding HTTP call against the care service.  No
//! retry layer: the send protocol's failure semantics assume each call
//! either succeeds or fails once, and timeouts are the transport's.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use pt_domain::agent::AgentFanout;
use pt_domain::config::ApiConfig;
use pt_domain::dog::Dog;
use pt_domain::error::{Error, Result};
use pt_domain::message::ChatMessage;
use pt_domain::profile::{AutoFillUpdate, ProactiveQuestion, ReportInfo};
use pt_domain::trace::TraceEvent;

use crate::gateway::{CareGateway, NewMessage};
use crate::types::ChatMessageDto;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the care service.
///
/// Created once and reused for the lifetime of the process.  The underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestCareClient {
    http: Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Serialize)]
struct QueryAgentsRequest<'a> {
    message: &'a str,
    dog_id: i64,
}

#[derive(Serialize)]
struct ProfileAnswerRequest<'a> {
    answer: &'a str,
    source: &'a str,
}

impl RestCareClient {
    /// Build a new client from the shared [`ApiConfig`].
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            auth_token: cfg.auth_token.clone(),
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decorate a `RequestBuilder` with the standard client headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let trace_id = Uuid::new_v4().to_string();
        let mut rb = rb
            .header("X-Client-Type", "pawtalk")
            .header("X-Trace-Id", &trace_id);

        if let Some(ref token) = self.auth_token {
            rb = rb.bearer_auth(token);
        }
        rb
    }

    /// Send one request, emit an `ApiCall` trace event, and map non-2xx
    /// statuses into [`Error::Api`] with the payload's message.
    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(resp) => {
                let status = resp.status();

                TraceEvent::ApiCall {
                    endpoint: endpoint.to_owned(),
                    status: status.as_u16(),
                    duration_ms,
                }
                .emit();

                if !status.is_success() {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(Error::Api {
                        status: status.as_u16(),
                        message: error_message(status, &body),
                    });
                }

                Ok(resp)
            }
            Err(e) => {
                TraceEvent::ApiCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();

                Err(from_reqwest(e))
            }
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        resp: Response,
    ) -> Result<T> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Http(format!("failed to parse {endpoint} response: {e}: {body}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl CareGateway for RestCareClient {
    async fn list_dogs(&self, user_id: i64) -> Result<Vec<Dog>> {
        let url = self.url(&format!("/v1/users/{user_id}/dogs"));
        let resp = self.execute("GET /v1/users/:id/dogs", self.http.get(&url)).await?;
        self.parse("dogs", resp).await
    }

    async fn list_messages(&self, dog_id: i64, limit: u32) -> Result<Vec<ChatMessage>> {
        let url = self.url(&format!("/v1/dogs/{dog_id}/chat/messages"));
        let resp = self
            .execute(
                "GET /v1/dogs/:id/chat/messages",
                self.http.get(&url).query(&[("limit", limit)]),
            )
            .await?;
        let dtos: Vec<ChatMessageDto> = self.parse("messages", resp).await?;
        Ok(dtos.into_iter().map(ChatMessage::from).collect())
    }

    async fn post_message(&self, dog_id: i64, message: NewMessage) -> Result<ChatMessage> {
        let url = self.url(&format!("/v1/dogs/{dog_id}/chat/messages"));
        let resp = self
            .execute(
                "POST /v1/dogs/:id/chat/messages",
                self.http.post(&url).json(&message),
            )
            .await?;
        let dto: ChatMessageDto = self.parse("message", resp).await?;
        Ok(dto.into())
    }

    async fn query_agents(&self, message: &str, dog_id: i64) -> Result<AgentFanout> {
        let url = self.url("/v1/chat/query");
        let req = QueryAgentsRequest { message, dog_id };
        let resp = self
            .execute("POST /v1/chat/query", self.http.post(&url).json(&req))
            .await?;
        self.parse("query", resp).await
    }

    async fn auto_fill_from_history(&self, dog_id: i64) -> Result<Vec<AutoFillUpdate>> {
        let url = self.url(&format!("/v1/dogs/{dog_id}/info/auto-fill-from-history"));
        let resp = self
            .execute(
                "POST /v1/dogs/:id/info/auto-fill-from-history",
                self.http.post(&url),
            )
            .await?;
        self.parse("auto-fill", resp).await
    }

    async fn random_unanswered_question(
        &self,
        dog_id: i64,
    ) -> Result<Option<ProactiveQuestion>> {
        let url = self.url(&format!("/v1/dogs/{dog_id}/info/random-unanswered"));
        match self
            .execute("GET /v1/dogs/:id/info/random-unanswered", self.http.get(&url))
            .await
        {
            Ok(resp) => Ok(Some(self.parse("question", resp).await?)),
            // 404 means every question is answered — expected, not an error.
            Err(Error::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn save_profile_answer(
        &self,
        dog_id: i64,
        key: &str,
        answer: &str,
        source: &str,
    ) -> Result<()> {
        let url = self.url(&format!("/v1/dogs/{dog_id}/info/{key}"));
        let req = ProfileAnswerRequest { answer, source };
        self.execute("PUT /v1/dogs/:id/info/:key", self.http.put(&url).json(&req))
            .await?;
        Ok(())
    }

    async fn create_report(&self, dog_id: i64) -> Result<ReportInfo> {
        let url = self.url(&format!("/v1/dogs/{dog_id}/reports/md"));
        let resp = self
            .execute("POST /v1/dogs/:id/reports/md", self.http.post(&url))
            .await?;
        self.parse("report", resp).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error conversion helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract a human-readable message from an error payload.  The service
/// returns `{"detail": …}` (FastAPI style); `{"message": …}` is accepted
/// as a fallback, then the bare status code.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_owned();
            }
        }
    }
    format!("HTTP {status}")
}

/// Convert a `reqwest::Error` into a domain error.  Timeouts become
/// `Error::Timeout`; everything else becomes `Error::Http`.
fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_detail_field() {
        let msg = error_message(StatusCode::NOT_FOUND, r#"{"detail": "Dog not found"}"#);
        assert_eq!(msg, "Dog not found");
    }

    #[test]
    fn error_message_accepts_message_field() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message": "bad input"}"#);
        assert_eq!(msg, "bad input");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        let msg = error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(msg, "HTTP 500 Internal Server Error");
    }
}
