//! One extraction request, from upload to response.
//!
//! Received -> Staged -> TextExtracted -> Extracted -> Formatted -> Released.
//! Any step may fail instead; once a file is staged it is released before the
//! outcome is reported, whatever that outcome is.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};

use crate::document::{self, DocumentPreview, PdfTextExtractor, TextExtractor};
use crate::error::{ExtractError, FailureKind};
use crate::extract::{DocumentType, ExtractionStrategy, ExtractorRegistry, StructuredExtractor};
use crate::response::{format_response, ExtractionEnvelope};
use crate::staging::{StagedFile, TempStorage, UploadedDocument};
use crate::Config;

pub struct Orchestrator {
    storage: TempStorage,
    decoder: Arc<dyn TextExtractor>,
    registry: ExtractorRegistry,
}

impl Orchestrator {
    pub fn new(
        storage: TempStorage,
        decoder: Arc<dyn TextExtractor>,
        registry: ExtractorRegistry,
    ) -> Self {
        Self { storage, decoder, registry }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let engine = Arc::new(StructuredExtractor::from_config(config)?);
        let registry = ExtractorRegistry::standard(engine);
        registry.ensure_complete()?;
        if config.api_key().is_none() {
            warn!("OPENAI_API_KEY is not set; only previews will succeed");
        }
        Ok(Self::new(
            TempStorage::from_config(config),
            Arc::new(PdfTextExtractor),
            registry,
        ))
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &TempStorage {
        &self.storage
    }

    pub async fn handle(
        &self,
        doc_type: DocumentType,
        document: Option<UploadedDocument>,
    ) -> Result<ExtractionEnvelope, ExtractError> {
        let document = match document {
            Some(document) if !document.is_empty() => document,
            _ => {
                warn!("rejected {} extraction: no file provided", doc_type);
                return Err(ExtractError::NoFileProvided);
            }
        };

        let strategy = self.registry.resolve(doc_type).inspect_err(|err| {
            error!("{}", err);
        })?;

        let staged = self.storage.stage(&document).await.inspect_err(|err| {
            error!("{} extraction of {:?}: {}", doc_type, document.display_name(), err);
        })?;
        drop(document);

        let token = staged.token();
        info!("[{}] {} extraction of {:?} started", token, doc_type, staged.display_name());

        let outcome = self.run(&staged, strategy.as_ref()).await;
        staged.release().await;

        match &outcome {
            Ok(envelope) => info!(
                "[{}] {} extraction finished in {:.2}s",
                token, doc_type, envelope.execution_time
            ),
            Err(err) => match err.kind() {
                FailureKind::UnreadableDocument => warn!("[{}] {}", token, err),
                _ => error!("[{}] {}", token, err),
            },
        }
        outcome
    }

    /// Stages, decodes and releases an upload without touching the provider.
    pub async fn preview(
        &self,
        document: Option<UploadedDocument>,
    ) -> Result<DocumentPreview, ExtractError> {
        let document = match document {
            Some(document) if !document.is_empty() => document,
            _ => {
                warn!("rejected preview: no file provided");
                return Err(ExtractError::NoFileProvided);
            }
        };

        let staged = self.storage.stage(&document).await.inspect_err(|err| {
            error!("preview of {:?}: {}", document.display_name(), err);
        })?;
        drop(document);

        let token = staged.token();
        let outcome = document::preview_text(self.decoder.clone(), &staged).await;
        staged.release().await;

        match &outcome {
            Ok(preview) => info!(
                "[{}] previewed {} chars of {} pages",
                token,
                preview.text.chars().count(),
                preview.page_count
            ),
            Err(err) => warn!("[{}] {}", token, err),
        }
        outcome
    }

    async fn run(
        &self,
        staged: &StagedFile,
        strategy: &dyn ExtractionStrategy,
    ) -> Result<ExtractionEnvelope, ExtractError> {
        let text = document::extract_text(self.decoder.clone(), staged).await?;

        let started = Instant::now();
        let result = strategy.extract(&text).await?;
        Ok(format_response(result, started))
    }
}
