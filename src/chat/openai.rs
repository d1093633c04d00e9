use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{LlmError, ResponseSchema, StructuredCompletion, Talk};
use crate::Config;

#[derive(Debug, Clone)]
pub struct ChatOptions {
    api_key: Option<String>,
    url: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl ChatOptions {
    pub fn new(api_key: Option<String>, url: impl Into<String>, model: impl Into<String>) -> Self {
        ChatOptions {
            api_key,
            url: url.into(),
            model: model.into(),
            temperature: 0.0,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key().map(str::to_string),
            config.openai_url.clone(),
            config.openai_model.clone(),
        )
        .with_temperature(config.temperature)
        .with_timeout(Duration::from_secs(config.request_timeout_secs))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct ChatClient {
    client: Client,
    options: ChatOptions,
}

impl ChatClient {
    pub fn new(options: ChatOptions) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .context("Failed to build HTTP client for the language model provider")?;
        Ok(Self { client, options })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(ChatOptions::from_config(config))
    }
}

#[async_trait]
impl StructuredCompletion for ChatClient {
    async fn complete(&self, messages: &[Talk], schema: &ResponseSchema) -> Result<Value, LlmError> {
        // A missing key is reported here, on first use, not at startup.
        let api_key = self
            .options
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let request = CompletionRequest {
            model: &self.options.model,
            messages,
            temperature: self.options.temperature,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: schema,
            },
        };

        debug!("requesting {} completion from {}", schema.name, self.options.url);
        let response = self.client
            .post(&self.options.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited(response.text().await.unwrap_or_default()));
        }
        if !status.is_success() {
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: CompletionResponse = response.json().await?;
        let message = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or(LlmError::EmptyResponse)?;

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Err(LlmError::Refusal(refusal));
        }

        let content = message
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        serde_json::from_str(&content).map_err(LlmError::MalformedOutput)
    }
}

#[derive(Serialize, Debug)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: &'a ResponseSchema,
}

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Talk],
    temperature: f32,
    response_format: ResponseFormat<'a>,
}

#[derive(Deserialize, Debug)]
struct AssistantMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<Choice>,
}
