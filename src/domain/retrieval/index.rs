//! Nearest-neighbour store seam

use async_trait::async_trait;
use std::fmt::Debug;

use super::{Document, SearchResult};
use crate::domain::DomainError;

/// Vector index over embedded chunks
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Store chunks with their precomputed vectors; both slices line up by position
    async fn add(&self, documents: Vec<Document>, vectors: Vec<Vec<f32>>) -> Result<usize, DomainError>;

    /// Top `k` chunks for `text`, most similar first
    async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>, DomainError>;

    /// Drop every stored chunk
    async fn reset(&self) -> Result<(), DomainError>;

    async fn count(&self) -> usize;
}
