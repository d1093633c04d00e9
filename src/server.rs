use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::warn;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::document::DocumentPreview;
use crate::error::{ExtractError, FailureKind};
use crate::extract::DocumentType;
use crate::orchestrator::Orchestrator;
use crate::response::{ErrorBody, ExtractionEnvelope};
use crate::staging::UploadedDocument;

const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported document type: {0}")]
    UnknownDocumentType(String),

    #[error("Invalid upload: {0}")]
    BadRequest(String),

    #[error("Uploaded file exceeds the size limit")]
    PayloadTooLarge,

    #[error(transparent)]
    Extraction(#[from] ExtractError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UnknownDocumentType(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Extraction(err) => match err.kind() {
                FailureKind::NoFileProvided => StatusCode::BAD_REQUEST,
                FailureKind::UnreadableDocument => StatusCode::UNPROCESSABLE_ENTITY,
                FailureKind::ExtractionFailed => StatusCode::BAD_GATEWAY,
                FailureKind::StagingFailed | FailureKind::Configuration => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        };

        let body = Json(ErrorBody {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub fn create_app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract/:doc_type", post(extract_document))
        .route("/preview", post(preview_document))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn extract_document(
    State(state): State<AppState>,
    Path(doc_type): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionEnvelope>, AppError> {
    let doc_type: DocumentType = doc_type
        .parse()
        .map_err(|_| AppError::UnknownDocumentType(doc_type))?;

    let document = read_upload(multipart).await?;
    let envelope = state.orchestrator.handle(doc_type, document).await?;
    Ok(Json(envelope))
}

async fn preview_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DocumentPreview>, AppError> {
    let document = read_upload(multipart).await?;
    let preview = state.orchestrator.preview(document).await?;
    Ok(Json(preview))
}

/// Pulls the `file` field out of the form. Other fields are ignored, and a
/// request without a multipart body carries no document at all.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Option<UploadedDocument>, AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!("request without multipart body: {}", rejection.body_text());
            return Ok(None);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let display_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty());
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(UploadedDocument::new(display_name, bytes.to_vec())));
    }
    Ok(None)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        warn!("rejected malformed upload: {}", err.body_text());
        AppError::BadRequest(err.body_text())
    }
}
