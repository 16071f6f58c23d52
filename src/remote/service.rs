//! Content-service client for OpenAI-compatible chat completions.
//!
//! Each request carries a JSON schema as `response_format`, so the model's reply
//! is a single JSON document. The reply is handed back unvalidated; checking it
//! against the puzzle's invariants is `validate`'s job.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::puzzle_engine::GameKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("rate limit or quota exceeded")]
    RateLimited,

    #[error("service returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("could not parse the reply: {0}")]
    Parse(String),

    #[error("reply contained no content")]
    MissingContent,
}

impl ServiceError {
    /// Quota and rate-limit failures only change the notice text shown to the user.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ServiceError::RateLimited => true,
            ServiceError::Status { body, .. } => {
                let body = body.to_ascii_lowercase();
                body.contains("quota") || body.contains("rate limit") || body.contains("resource_exhausted")
            }
            _ => false,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

/// One structured-output request.
#[derive(Debug, Clone, Serialize)]
pub struct ContentRequest {
    pub game: GameKind,
    pub schema_name: &'static str,
    pub schema: Value,
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Anything that can answer a [`ContentRequest`] with a JSON document.
///
/// Single-shot: implementations must not retry.
#[allow(async_fn_in_trait)]
pub trait ContentService {
    async fn complete(&self, request: &ContentRequest) -> Result<Value, ServiceError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Request body for /v1/chat/completions.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: Value,
}

/// Response from /v1/chat/completions.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// HTTP implementation of [`ContentService`].
#[derive(Clone)]
pub struct HttpContentService {
    client: reqwest::Client,
    config: ServiceConfig,
}

impl HttpContentService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ServiceError::from_reqwest)?;
        Ok(Self { client, config })
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.endpoint.trim_end_matches('/'))
    }

    fn body<'a>(&'a self, request: &ContentRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system".to_string(), content: request.system_prompt.clone() },
                ChatMessage { role: "user".to_string(), content: request.user_prompt.clone() },
            ],
            temperature: self.config.temperature,
            response_format: serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "strict": true,
                    "schema": request.schema,
                }
            }),
        }
    }
}

/// Map a finished HTTP exchange to the model's JSON reply.
///
/// 429 is a rate limit; any other non-success status keeps its body so a quota
/// message can still be recognized. A success body must be a chat completion
/// whose first choice holds a JSON document.
fn read_reply(status: StatusCode, body: &str) -> Result<Value, ServiceError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ServiceError::RateLimited);
    }
    if !status.is_success() {
        return Err(ServiceError::Status { code: status.as_u16(), body: body.to_string() });
    }

    let chat: ChatResponse = serde_json::from_str(body).map_err(|e| ServiceError::Parse(e.to_string()))?;

    let content = chat
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(ServiceError::MissingContent)?;

    serde_json::from_str(&content).map_err(|e| ServiceError::Parse(e.to_string()))
}

impl ContentService for HttpContentService {
    async fn complete(&self, request: &ContentRequest) -> Result<Value, ServiceError> {
        let mut builder = self.client.post(self.url()).json(&self.body(request));
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(ServiceError::from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(ServiceError::from_reqwest)?;
        read_reply(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(endpoint: &str) -> HttpContentService {
        let config = ServiceConfig { endpoint: endpoint.to_string(), ..ServiceConfig::default() };
        HttpContentService::new(config).expect("client")
    }

    #[test]
    fn url_drops_trailing_slash() {
        assert_eq!(service("http://localhost:8000/").url(), "http://localhost:8000/v1/chat/completions");
        assert_eq!(service("http://localhost:8000").url(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn body_carries_schema_as_response_format() {
        let svc = service("http://localhost:8000");
        let request = ContentRequest {
            game: GameKind::PatternGrid,
            schema_name: "pattern_grid",
            schema: serde_json::json!({ "type": "object" }),
            system_prompt: "sys".into(),
            user_prompt: "user".into(),
        };
        let body = serde_json::to_value(svc.body(&request)).expect("serialize");
        assert_eq!(body["response_format"]["json_schema"]["name"], "pattern_grid");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user");
    }

    #[test]
    fn quota_message_counts_as_rate_limit() {
        let err = ServiceError::Status { code: 403, body: "Quota exceeded for project".into() };
        assert!(err.is_rate_limited());
        assert!(ServiceError::RateLimited.is_rate_limited());
        assert!(!ServiceError::Timeout.is_rate_limited());
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn reply_content_is_parsed_as_json() {
        let body = completion(r#"{"title":"Skip count","answer":4}"#);
        let value = read_reply(StatusCode::OK, &body).expect("valid reply");
        assert_eq!(value["answer"], 4);
    }

    #[test]
    fn too_many_requests_is_a_rate_limit() {
        assert_eq!(read_reply(StatusCode::TOO_MANY_REQUESTS, ""), Err(ServiceError::RateLimited));
    }

    #[test]
    fn other_failures_keep_status_and_body() {
        let err = read_reply(StatusCode::FORBIDDEN, "RESOURCE_EXHAUSTED: daily quota").expect_err("status");
        assert_eq!(err, ServiceError::Status { code: 403, body: "RESOURCE_EXHAUSTED: daily quota".into() });
        assert!(err.is_rate_limited());

        let err = read_reply(StatusCode::INTERNAL_SERVER_ERROR, "boom").expect_err("status");
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn empty_choices_is_missing_content() {
        assert_eq!(read_reply(StatusCode::OK, r#"{"choices":[]}"#), Err(ServiceError::MissingContent));
    }

    #[test]
    fn malformed_replies_are_parse_errors() {
        assert!(matches!(read_reply(StatusCode::OK, "not json"), Err(ServiceError::Parse(_))));
        assert!(matches!(read_reply(StatusCode::OK, &completion("the grid is 1, 2, 3")), Err(ServiceError::Parse(_))));
    }
}
