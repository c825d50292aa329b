//! Document parser trait and types

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;

use crate::domain::DomainError;

/// An uploaded file awaiting ingestion
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension, empty when there is none
    pub fn extension(&self) -> String {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default()
    }
}

/// An upload spooled to disk under its original name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub file_name: String,
    pub path: PathBuf,
}

impl StagedUpload {
    pub fn new(file_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
            path: path.into(),
        }
    }

    /// Read the spooled bytes back as an upload
    pub async fn load(&self) -> Result<UploadedFile, DomainError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::storage(format!("Failed to read staged {}: {}", self.file_name, e))
        })?;
        Ok(UploadedFile::new(self.file_name.clone(), bytes))
    }
}

/// Extracts raw text from an uploaded file
#[async_trait]
pub trait DocumentParser: Send + Sync + Debug {
    /// Get supported file extensions (e.g., ["txt", "md"])
    fn supported_extensions(&self) -> &[&str];

    async fn parse(&self, file: &UploadedFile) -> Result<String, DomainError>;

    fn supports_file(&self, file: &UploadedFile) -> bool {
        let ext = file.extension();
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext))
    }
}
