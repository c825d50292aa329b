use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Renders text as a handwritten-style note file
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NoteRenderer: Send + Sync + Debug {
    /// Write the rendered note to `output`
    async fn render(&self, text: &str, output: &Path) -> Result<(), DomainError>;

    /// Extension of the produced file, without the dot
    fn file_extension(&self) -> &'static str;
}
