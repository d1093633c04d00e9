//! Request-scoped staging of uploaded bytes on local disk.
//!
//! Every staged upload is keyed by a fresh UUID, never by the client-supplied
//! file name, so concurrent uploads that share a name cannot overwrite or
//! delete each other. A [`StagedFile`] removes its backing file when released
//! or, failing that, when dropped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::error::ExtractError;
use crate::Config;

const DEFAULT_EXTENSION: &str = "pdf";
const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub display_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(display_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { display_name, bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("unnamed")
    }
}

#[derive(Debug, Clone)]
pub struct TempStorage {
    root: PathBuf,
}

impl TempStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.staging_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn stage(&self, document: &UploadedDocument) -> Result<StagedFile, ExtractError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(ExtractError::Staging)?;

        let token = Uuid::new_v4();
        let extension = extension_hint(document.display_name.as_deref());
        let path = self.root.join(format!("{}.{}", token, extension));

        // create_new refuses to open an existing file, so a collision fails
        // instead of clobbering another request's upload.
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(ExtractError::Staging)?;

        let staged = StagedFile {
            token,
            path,
            display_name: document.display_name().to_string(),
            released: false,
        };
        let staged = fill(staged, file, &document.bytes).await?;

        debug!(
            "staged {:?} ({} bytes) as {}",
            staged.display_name,
            document.bytes.len(),
            staged.path.display()
        );
        Ok(staged)
    }
}

async fn fill<W>(staged: StagedFile, file: W, bytes: &[u8]) -> Result<StagedFile, ExtractError>
where
    W: AsyncWrite + Unpin,
{
    // On failure `staged` drops here and removes the partial file.
    write_contents(file, bytes)
        .await
        .map_err(ExtractError::Staging)?;
    Ok(staged)
}

async fn write_contents<W>(mut file: W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    file.write_all(bytes).await?;
    file.flush().await
}

#[derive(Debug)]
pub struct StagedFile {
    token: Uuid,
    path: PathBuf,
    display_name: String,
    released: bool,
}

impl StagedFile {
    pub fn token(&self) -> Uuid {
        self.token
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Deletes the backing file. Never fails: a missing file counts as
    /// removed and any other error is logged.
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("released staged file {}", self.path.display()),
            Err(err) => log_cleanup_error(&self.path, err),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("released staged file {} on drop", self.path.display()),
            Err(err) => log_cleanup_error(&self.path, err),
        }
    }
}

fn log_cleanup_error(path: &Path, err: std::io::Error) {
    if err.kind() == ErrorKind::NotFound {
        debug!("staged file {} already removed", path.display());
    } else {
        warn!("failed to delete staged file {}: {}", path.display(), err);
    }
}

fn extension_hint(display_name: Option<&str>) -> String {
    display_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
