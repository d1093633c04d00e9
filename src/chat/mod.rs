use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod openai;

pub use openai::{ChatClient, ChatOptions};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Talk {
    pub role: Role,
    pub content: String,
}

impl Talk {
    pub fn new(role: Role, content: String) -> Self {
        Self { role, content }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: Value,
    pub strict: bool,
}

/// Schema-constrained completion: one call, one JSON document back.
#[async_trait]
pub trait StructuredCompletion: Send + Sync {
    async fn complete(&self, messages: &[Talk], schema: &ResponseSchema) -> Result<Value, LlmError>;
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured for the language model provider")]
    MissingApiKey,

    #[error("language model request timed out")]
    Timeout,

    #[error("language model provider is rate limiting requests: {0}")]
    RateLimited(String),

    #[error("language model request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to reach language model provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("language model refused the request: {0}")]
    Refusal(String),

    #[error("language model returned an unreadable response: {0}")]
    UnreadableResponse(#[source] reqwest::Error),

    #[error("language model returned no content")]
    EmptyResponse,

    #[error("language model returned invalid JSON: {0}")]
    MalformedOutput(#[source] serde_json::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_decode() {
            LlmError::UnreadableResponse(err)
        } else {
            LlmError::Transport(err)
        }
    }
}
