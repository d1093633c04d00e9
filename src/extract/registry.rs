use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DocumentType, ExtractionResult, StructuredExtractor};
use crate::chat::ResponseSchema;
use crate::error::ExtractError;
use crate::schema::{AirWaybillSchema, ExtractionSchema, InvoiceSchema, PackingListSchema};

/// Extraction behaviour bound to exactly one schema.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn schema_name(&self) -> &'static str;

    fn response_schema(&self) -> ResponseSchema;

    async fn extract(&self, text: &str) -> Result<ExtractionResult, ExtractError>;
}

pub struct SchemaStrategy<S> {
    engine: Arc<StructuredExtractor>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: ExtractionSchema> SchemaStrategy<S> {
    pub fn new(engine: Arc<StructuredExtractor>) -> Self {
        Self {
            engine,
            _schema: PhantomData,
        }
    }
}

#[async_trait]
impl<S: ExtractionSchema> ExtractionStrategy for SchemaStrategy<S> {
    fn schema_name(&self) -> &'static str {
        S::NAME
    }

    fn response_schema(&self) -> ResponseSchema {
        S::response_schema()
    }

    async fn extract(&self, text: &str) -> Result<ExtractionResult, ExtractError> {
        let record = self.engine.extract::<S>(text).await?;
        ExtractionResult::from_record(&record)
    }
}

/// Explicit document type to strategy table, built once at startup.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    strategies: HashMap<DocumentType, Arc<dyn ExtractionStrategy>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard(engine: Arc<StructuredExtractor>) -> Self {
        let mut registry = Self::new();
        registry
            .register_schema::<InvoiceSchema>(DocumentType::Invoice, &engine)
            .register_schema::<PackingListSchema>(DocumentType::PackingList, &engine)
            .register_schema::<AirWaybillSchema>(DocumentType::Awb, &engine);
        registry
    }

    pub fn register(
        &mut self,
        doc_type: DocumentType,
        strategy: Arc<dyn ExtractionStrategy>,
    ) -> &mut Self {
        self.strategies.insert(doc_type, strategy);
        self
    }

    pub fn register_schema<S: ExtractionSchema>(
        &mut self,
        doc_type: DocumentType,
        engine: &Arc<StructuredExtractor>,
    ) -> &mut Self {
        self.register(doc_type, Arc::new(SchemaStrategy::<S>::new(engine.clone())))
    }

    pub fn resolve(&self, doc_type: DocumentType) -> Result<Arc<dyn ExtractionStrategy>, ExtractError> {
        self.strategies
            .get(&doc_type)
            .cloned()
            .ok_or(ExtractError::Unregistered(doc_type))
    }

    /// Fails on the first known document type without a strategy.
    pub fn ensure_complete(&self) -> Result<(), ExtractError> {
        match DocumentType::ALL
            .into_iter()
            .find(|t| !self.strategies.contains_key(t))
        {
            Some(missing) => Err(ExtractError::Unregistered(missing)),
            None => Ok(()),
        }
    }

    pub fn document_types(&self) -> Vec<DocumentType> {
        let mut types: Vec<_> = self.strategies.keys().copied().collect();
        types.sort();
        types
    }
}
