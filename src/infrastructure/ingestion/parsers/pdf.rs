//! PDF text extraction

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ingestion::{DocumentParser, UploadedFile};
use crate::domain::DomainError;

const NO_TEXT: &str =
    "Could not extract text from the PDF. It might be an image-based PDF without OCR.";

/// Parser for text-based PDF files
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for PdfParser {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn parse(&self, file: &UploadedFile) -> Result<String, DomainError> {
        let bytes = file.bytes.clone();
        let file_name = file.file_name.clone();

        // pdf-extract is synchronous and can be slow on large files
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| DomainError::ingestion(format!("PDF extraction aborted: {}", e)))?
            .map_err(|e| {
                DomainError::ingestion(format!("Failed to read PDF {}: {}", file_name, e))
            })?;

        if text.trim().is_empty() {
            return Err(DomainError::ingestion(NO_TEXT));
        }

        debug!(file = %file.file_name, chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}
