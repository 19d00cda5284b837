//! Icon file storage
//!
//! Uploaded icons are written under the configured upload directory as
//! `icon_<uuid>.<ext>` and served back under `/uploads/`.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// URL prefix the upload directory is served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const MAX_EXTENSION_LEN: usize = 10;

/// Upload failure; every variant is reported to the client as a 400
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file provided")]
    MissingFile,

    #[error("file name has no usable extension")]
    InvalidExtension,

    #[error("could not read upload: {0}")]
    Multipart(String),

    #[error("could not store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes icon files into one directory
#[derive(Debug, Clone)]
pub struct IconStore {
    dir: PathBuf,
}

impl IconStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `data` under a fresh name derived from `original_name`'s
    /// extension. Returns the public path, e.g. `/uploads/icon_<uuid>.png`.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, UploadError> {
        let filename = stored_filename(original_name)?;

        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&filename);

        // create_new: never overwrite an existing icon
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_remove(&path, file, data).await?;

        tracing::info!(file = %filename, bytes = data.len(), "icon stored");
        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, filename))
    }
}

/// Write `data` through `out`. On failure the partial file at `path` is
/// deleted before the error is returned.
async fn write_or_remove<W>(path: &Path, mut out: W, data: &[u8]) -> Result<(), UploadError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(data).await?;
        out.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(out);
        if let Err(cleanup) = fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                error = %cleanup,
                "could not remove partial upload"
            );
        }
        return Err(err.into());
    }
    Ok(())
}

/// `icon_<uuid>.<ext>` where `ext` is the original extension, alphanumeric
/// and at most ten characters.
fn stored_filename(original_name: &str) -> Result<String, UploadError> {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= MAX_EXTENSION_LEN)
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .ok_or(UploadError::InvalidExtension)?;

    Ok(format!("icon_{}.{}", Uuid::new_v4(), ext))
}
