//! Plain text document parser

use async_trait::async_trait;

use crate::domain::ingestion::{DocumentParser, UploadedFile};
use crate::domain::DomainError;

/// Parser for UTF-8 text and markdown files
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for PlainTextParser {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text", "md", "markdown"]
    }

    async fn parse(&self, file: &UploadedFile) -> Result<String, DomainError> {
        String::from_utf8(file.bytes.clone()).map_err(|e| {
            DomainError::ingestion(format!("{} is not valid UTF-8: {}", file.file_name, e))
        })
    }
}
