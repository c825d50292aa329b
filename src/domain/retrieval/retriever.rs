//! Retriever seam read by the RAG workflow and the study tools

use async_trait::async_trait;
use std::fmt::Debug;

use super::SearchResult;
use crate::domain::DomainError;

/// Default number of chunks per retrieval
pub const DEFAULT_TOP_K: usize = 3;

/// Chunks per retrieval after a fresh batch ingestion
pub const BATCH_TOP_K: usize = 5;

/// A queryable handle bound to a populated index
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>, DomainError>;

    /// Number of chunks `retrieve` asks for
    fn top_k(&self) -> usize;

    async fn retrieve(&self, text: &str) -> Result<Vec<SearchResult>, DomainError> {
        self.query(text, self.top_k()).await
    }
}
