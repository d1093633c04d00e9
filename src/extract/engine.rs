use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::chat::{ChatClient, Role, StructuredCompletion, Talk};
use crate::error::ExtractError;
use crate::schema::ExtractionSchema;
use crate::Config;

/// Schema-agnostic extraction: one system directive, the document text as the
/// only user message, one provider call.
pub struct StructuredExtractor {
    llm: Arc<dyn StructuredCompletion>,
    system_prompt: String,
}

impl StructuredExtractor {
    pub fn new(llm: Arc<dyn StructuredCompletion>, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = ChatClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config.system_prompt.clone()))
    }

    pub fn instruction_frame(&self, text: &str) -> Vec<Talk> {
        vec![
            Talk::new(Role::System, self.system_prompt.clone()),
            Talk::new(Role::User, text.to_string()),
        ]
    }

    /// Blank text yields the all-null record without calling the provider.
    /// Provider failures and output that does not fit `S` are errors; there
    /// is no retry.
    pub async fn extract<S: ExtractionSchema>(&self, text: &str) -> Result<S, ExtractError> {
        if text.trim().is_empty() {
            debug!("no text to extract {} from, returning empty record", S::NAME);
            return Ok(S::default());
        }

        let messages = self.instruction_frame(text);
        let mut value = self.llm.complete(&messages, &S::response_schema()).await?;

        if !value.is_object() {
            return Err(ExtractError::SchemaViolation {
                schema: S::NAME,
                source: serde::de::Error::custom(format!(
                    "expected a JSON object, got {}",
                    json_kind(&value)
                )),
            });
        }

        normalize_blanks(&mut value);
        serde_json::from_value(value)
            .map_err(|source| ExtractError::SchemaViolation { schema: S::NAME, source })
    }
}

/// Replaces blank strings with `null`, recursively.
pub fn normalize_blanks(value: &mut Value) {
    let blank = matches!(value, Value::String(s) if s.trim().is_empty());
    if blank {
        *value = Value::Null;
        return;
    }
    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize_blanks),
        Value::Object(map) => map.values_mut().for_each(normalize_blanks),
        _ => {}
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
