#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use docxtract::chat::{LlmError, ResponseSchema, StructuredCompletion, Talk};
use docxtract::document::TextExtractor;
use docxtract::server::{create_app, AppState};
use docxtract::{ExtractorRegistry, Orchestrator, StructuredExtractor, TempStorage};

pub const BOUNDARY: &str = "----docxtract-test-boundary";

pub enum Canned {
    Reply(Value),
    Timeout,
}

pub struct CannedModel {
    canned: Canned,
    calls: AtomicUsize,
}

impl CannedModel {
    pub fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self { canned, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructuredCompletion for CannedModel {
    async fn complete(&self, _messages: &[Talk], _schema: &ResponseSchema) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.canned {
            Canned::Reply(value) => Ok(value.clone()),
            Canned::Timeout => Err(LlmError::Timeout),
        }
    }
}

pub struct StaticDecoder(pub Option<&'static str>);

impl TextExtractor for StaticDecoder {
    fn extract_pages(&self, _path: &Path) -> anyhow::Result<Vec<String>> {
        match self.0 {
            Some(text) => Ok(vec![text.to_string()]),
            None => anyhow::bail!("file is not a PDF"),
        }
    }
}

pub fn app(root: &Path, decoder: StaticDecoder, model: Arc<CannedModel>, limit: usize) -> Router {
    let _ = tracing_subscriber::fmt::try_init();
    let engine = Arc::new(StructuredExtractor::new(model, "extract"));
    let orchestrator = Orchestrator::new(
        TempStorage::new(root),
        Arc::new(decoder),
        ExtractorRegistry::standard(engine),
    );
    create_app(AppState { orchestrator: Arc::new(orchestrator) }, limit)
}

/// Builds a multipart body from `(field name, file name, content)` parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (u16, Value) {
    let response: Response<Body> = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, json)
}

pub fn is_empty_dir(root: &Path) -> bool {
    std::fs::read_dir(root).map(|mut d| d.next().is_none()).unwrap_or(true)
}
