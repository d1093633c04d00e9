pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod response;
pub mod schema;
pub mod server;
pub mod staging;

#[cfg(test)]
mod testing;

pub use config::{read_config, Config};
pub use document::DocumentPreview;
pub use error::{ExtractError, FailureKind};
pub use extract::{DocumentType, ExtractorRegistry, StructuredExtractor};
pub use orchestrator::Orchestrator;
pub use response::ExtractionEnvelope;
pub use staging::{TempStorage, UploadedDocument};
