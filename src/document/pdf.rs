use anyhow::Context;
use std::path::Path;

use super::TextExtractor;

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        pdf_extract::extract_text_by_pages(path)
            .with_context(|| format!("Failed to decode PDF {}", path.display()))
    }
}
