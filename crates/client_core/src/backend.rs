//! Upload and query capabilities injected into the controllers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::StatusCode;
use shared::domain::UploadedFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{operation} failed (HTTP {status})")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no uploaded file to query against")]
    MissingUploadedFile,
}

#[derive(Debug, Clone)]
pub enum FileContent {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A user-selected file. Path-backed content is read only when a backend needs the bytes.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub content: FileContent,
}

impl FileUpload {
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_raw()
            .map(str::to_string);
        Self {
            filename,
            mime_type,
            content: FileContent::Bytes(bytes),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let mime_type = mime_guess::from_path(path).first_raw().map(str::to_string);
        Self {
            filename,
            mime_type,
            content: FileContent::Path(path.to_path_buf()),
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::Path(path) => Some(path),
            FileContent::Bytes(_) => None,
        }
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, BackendError> {
        match &self.content {
            FileContent::Bytes(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| BackendError::ReadFile {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

#[async_trait]
pub trait UploadBackend: Send + Sync {
    async fn upload(&self, file: &FileUpload) -> Result<UploadedFile, BackendError>;

    fn success_message(&self, filename: &str) -> String {
        format!("File \"{filename}\" uploaded.")
    }
}

#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn answer(
        &self,
        question: &str,
        file: Option<&UploadedFile>,
    ) -> Result<String, BackendError>;

    /// Whether a question may only be sent once a file has been uploaded.
    fn requires_uploaded_file(&self) -> bool {
        true
    }
}
