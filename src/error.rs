use thiserror::Error;

use crate::chat::LlmError;
use crate::extract::DocumentType;

/// Failure classification a transport adapter maps to a status signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoFileProvided,
    UnreadableDocument,
    ExtractionFailed,
    StagingFailed,
    Configuration,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No file provided")]
    NoFileProvided,

    #[error("No extractor registered for document type '{0}'")]
    Unregistered(DocumentType),

    #[error("Failed to stage upload: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Unable to read document: {0}")]
    UnreadableDocument(String),

    #[error("Extraction failed: {0}")]
    Provider(#[from] LlmError),

    #[error("Extraction failed: model output does not match the {schema} schema: {source}")]
    SchemaViolation {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::NoFileProvided => FailureKind::NoFileProvided,
            ExtractError::Unregistered(_) => FailureKind::Configuration,
            ExtractError::Staging(_) => FailureKind::StagingFailed,
            ExtractError::UnreadableDocument(_) => FailureKind::UnreadableDocument,
            ExtractError::Provider(_) | ExtractError::SchemaViolation { .. } => {
                FailureKind::ExtractionFailed
            }
        }
    }
}
