//! In-process fakes for the provider and the PDF decoder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::chat::{LlmError, ResponseSchema, StructuredCompletion, Talk};
use crate::document::TextExtractor;

type Reply = Box<dyn Fn() -> Result<Value, LlmError> + Send + Sync>;

pub(crate) struct ScriptedModel {
    reply: Reply,
    calls: Mutex<Vec<(Vec<Talk>, ResponseSchema)>>,
}

impl ScriptedModel {
    pub(crate) fn replying(value: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || Ok(value.clone())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing(error: impl Fn() -> LlmError + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || Err(error())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<(Vec<Talk>, ResponseSchema)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredCompletion for ScriptedModel {
    async fn complete(&self, messages: &[Talk], schema: &ResponseSchema) -> Result<Value, LlmError> {
        self.calls.lock().unwrap().push((messages.to_vec(), schema.clone()));
        (self.reply)()
    }
}

/// Decoder returning canned pages, remembering every path it was given and
/// whether the file existed at that moment.
pub(crate) struct FakeDecoder {
    pages: Option<Vec<String>>,
    seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl FakeDecoder {
    pub(crate) fn pages(pages: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            pages: Some(pages.iter().map(|p| p.to_string()).collect()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn unreadable() -> Arc<Self> {
        Arc::new(Self { pages: None, seen: Mutex::new(Vec::new()) })
    }

    pub(crate) fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

impl TextExtractor for FakeDecoder {
    fn extract_pages(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        self.seen.lock().unwrap().push((path.to_path_buf(), path.exists()));
        match &self.pages {
            Some(pages) => Ok(pages.clone()),
            None => anyhow::bail!("not a PDF"),
        }
    }
}
