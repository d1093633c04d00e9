pub mod pdf;

use std::path::Path;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::staging::StagedFile;

pub use pdf::PdfTextExtractor;

pub const PREVIEW_PAGES: usize = 2;
pub const PREVIEW_CHARS: usize = 2000;

/// Black-box document decoder: one string per page, in document order.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> anyhow::Result<Vec<String>>;
}

/// Decodes a staged upload into plain text.
///
/// Decoding runs on the blocking pool. A decoder error or panic is reported
/// as [`ExtractError::UnreadableDocument`]; a document without any text is
/// an empty string, not an error.
pub async fn extract_text(
    extractor: Arc<dyn TextExtractor>,
    staged: &StagedFile,
) -> Result<String, ExtractError> {
    let pages = decode_pages(extractor, staged).await?;

    let page_count = pages.len();
    let text = join_pages(pages);
    debug!(
        "extracted {} chars from {} pages of {:?}",
        text.len(),
        page_count,
        staged.display_name()
    );
    Ok(text)
}

/// Decodes only as much of a staged upload as a preview shows.
pub async fn preview_text(
    extractor: Arc<dyn TextExtractor>,
    staged: &StagedFile,
) -> Result<DocumentPreview, ExtractError> {
    let pages = decode_pages(extractor, staged).await?;
    Ok(DocumentPreview::from_pages(pages))
}

async fn decode_pages(
    extractor: Arc<dyn TextExtractor>,
    staged: &StagedFile,
) -> Result<Vec<String>, ExtractError> {
    let path = staged.path().to_path_buf();
    tokio::task::spawn_blocking(move || extractor.extract_pages(&path))
        .await
        .map_err(|err| {
            ExtractError::UnreadableDocument(format!("decoder aborted: {}", err))
        })?
        .map_err(|err| ExtractError::UnreadableDocument(format!("{:#}", err)))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentPreview {
    pub text: String,
    pub page_count: usize,
    pub truncated: bool,
}

impl DocumentPreview {
    pub fn from_pages(pages: Vec<String>) -> Self {
        let page_count = pages.len();
        let text = join_pages(pages.into_iter().take(PREVIEW_PAGES).collect());
        let (text, cut) = match text.char_indices().nth(PREVIEW_CHARS) {
            Some((end, _)) => (text[..end].to_string(), true),
            None => (text, false),
        };
        Self {
            text,
            page_count,
            truncated: cut || page_count > PREVIEW_PAGES,
        }
    }
}

/// Joins non-blank pages with a single newline. Blank pages leave no trace.
pub fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .map(|page| clean_page(&page))
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn clean_page(page: &str) -> String {
    page.replace(|c: char| c.is_control() && c != '\n' && c != '\t', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::{TempStorage, UploadedDocument};

    struct FixedPages(Vec<&'static str>);

    impl TextExtractor for FixedPages {
        fn extract_pages(&self, _path: &Path) -> anyhow::Result<Vec<String>> {
            Ok(self.0.iter().map(|p| p.to_string()).collect())
        }
    }

    struct Panicking;

    impl TextExtractor for Panicking {
        fn extract_pages(&self, _path: &Path) -> anyhow::Result<Vec<String>> {
            panic!("decoder bug")
        }
    }

    struct Failing;

    impl TextExtractor for Failing {
        fn extract_pages(&self, _path: &Path) -> anyhow::Result<Vec<String>> {
            anyhow::bail!("invalid xref table")
        }
    }

    async fn staged(storage: &TempStorage) -> anyhow::Result<StagedFile> {
        let doc = UploadedDocument::new(Some("doc.pdf".into()), b"%PDF".to_vec());
        Ok(storage.stage(&doc).await?)
    }

    #[test]
    fn test_join_skips_blank_pages() {
        let pages = vec![
            "Page one".to_string(),
            "".to_string(),
            "  \n ".to_string(),
            "Page\u{0c} three".to_string(),
        ];
        assert_eq!(join_pages(pages), "Page one\nPage three");
    }

    #[test]
    fn test_join_no_pages_is_empty() {
        assert_eq!(join_pages(Vec::new()), "");
        assert_eq!(join_pages(vec!["".into(), " ".into()]), "");
    }

    #[test]
    fn test_preview_keeps_first_two_pages() {
        let pages = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let preview = DocumentPreview::from_pages(pages);
        assert_eq!(preview.text, "one\ntwo");
        assert_eq!(preview.page_count, 3);
        assert!(preview.truncated);

        let preview = DocumentPreview::from_pages(vec!["only".to_string()]);
        assert_eq!(preview.text, "only");
        assert!(!preview.truncated);
    }

    #[test]
    fn test_preview_caps_characters() {
        let long = "é".repeat(PREVIEW_CHARS + 10);
        let preview = DocumentPreview::from_pages(vec![long]);
        assert_eq!(preview.text.chars().count(), PREVIEW_CHARS);
        assert!(preview.truncated);

        let exact = "a".repeat(PREVIEW_CHARS);
        let preview = DocumentPreview::from_pages(vec![exact.clone()]);
        assert_eq!(preview.text, exact);
        assert!(!preview.truncated);
    }

    #[tokio::test]
    async fn test_extract_text_in_page_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = TempStorage::new(dir.path());
        let staged = staged(&storage).await?;

        let extractor = Arc::new(FixedPages(vec!["first", "", "second"]));
        let text = extract_text(extractor, &staged).await?;
        assert_eq!(text, "first\nsecond");
        staged.release().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_decoder_error_is_unreadable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = TempStorage::new(dir.path());
        let staged = staged(&storage).await?;

        let err = extract_text(Arc::new(Failing), &staged).await.unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(ref msg) if msg.contains("xref")));
        staged.release().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_decoder_panic_is_unreadable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = TempStorage::new(dir.path());
        let staged = staged(&storage).await?;

        let err = extract_text(Arc::new(Panicking), &staged).await.unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument(_)));
        staged.release().await;
        Ok(())
    }
}
