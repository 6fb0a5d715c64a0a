use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::errors::ApiError;
use crate::models::UploadedFile;

/// Stores uploaded files under a single directory and builds their public URLs
#[derive(Debug, Clone)]
pub struct UploadService {
    upload_dir: PathBuf,
    public_base_url: String,
}

impl UploadService {
    pub fn new(upload_dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_upload_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.upload_dir).await
    }

    pub fn file_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, filename)
    }

    /// Write `bytes` under the client-supplied `filename`, replacing any existing file.
    pub async fn store(&self, filename: &str, title: &str, bytes: &[u8]) -> Result<UploadedFile, ApiError> {
        validate_filename(filename)?;

        self.ensure_upload_dir().await?;
        let path = self.upload_dir.join(filename);
        fs::write(&path, bytes).await?;

        info!(
            filename = %filename,
            title = %title,
            size_bytes = bytes.len(),
            path = %path.display(),
            "Stored uploaded file"
        );

        Ok(UploadedFile {
            filename: filename.to_string(),
            title: title.to_string(),
            file_url: self.file_url(filename),
            size_bytes: bytes.len(),
        })
    }
}

/// Filenames are stored verbatim, but never outside the upload directory.
///
/// Separators follow the host platform: `\` is an ordinary character on Unix.
pub fn validate_filename(filename: &str) -> Result<(), ApiError> {
    if filename.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file has no filename".to_string()));
    }

    if filename == "." || filename == ".." || filename.chars().any(std::path::is_separator) {
        return Err(ApiError::BadRequest(format!(
            "Filename '{}' is not allowed",
            filename
        )));
    }

    Ok(())
}
