use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::ExtractError;
use crate::schema::{self, ExtractionSchema};

pub mod engine;
pub mod registry;

pub use engine::StructuredExtractor;
pub use registry::{ExtractionStrategy, ExtractorRegistry, SchemaStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentType {
    Invoice,
    PackingList,
    Awb,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::PackingList,
        DocumentType::Awb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::PackingList => "packing-list",
            DocumentType::Awb => "awb",
        }
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unsupported document type: {0}")]
pub struct UnknownDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = UnknownDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownDocumentType(s.to_string()))
    }
}

/// A populated record in plain structured form, tagged with its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    schema: &'static str,
    data: Map<String, Value>,
}

impl ExtractionResult {
    pub fn from_record<S: ExtractionSchema>(record: &S) -> Result<Self, ExtractError> {
        let data = schema::to_structured(record)
            .map_err(|source| ExtractError::SchemaViolation { schema: S::NAME, source })?;
        Ok(Self { schema: S::NAME, data })
    }

    pub fn schema(&self) -> &'static str {
        self.schema
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    pub fn into_record<S: ExtractionSchema>(self) -> Result<S, serde_json::Error> {
        serde_json::from_value(Value::Object(self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InvoiceItem, InvoiceSchema};

    #[test]
    fn test_document_type_round_trip() {
        for doc_type in DocumentType::ALL {
            assert_eq!(doc_type.as_str().parse::<DocumentType>().unwrap(), doc_type);
        }
        assert_eq!("packing-list".parse::<DocumentType>().unwrap(), DocumentType::PackingList);
        let err = "receipt".parse::<DocumentType>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported document type: receipt");
        assert!("Invoice".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_result_round_trips_to_record() {
        let record = InvoiceSchema {
            invoice_number: Some("INV-9".into()),
            items: Some(vec![
                InvoiceItem { number: Some("1".into()), ..Default::default() },
                InvoiceItem { number: Some("2".into()), description: Some("Bolts".into()), ..Default::default() },
            ]),
            ..Default::default()
        };
        let result = ExtractionResult::from_record(&record).unwrap();
        assert_eq!(result.schema(), "invoice");
        assert_eq!(result.data()["items"][1]["description"], "Bolts");
        assert_eq!(result.into_record::<InvoiceSchema>().unwrap(), record);
    }
}
