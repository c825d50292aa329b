//! Embedding provider seam

mod provider;
mod vectors;

pub use provider::EmbeddingProvider;
pub use vectors::{cosine_similarity, Embedding, EmbeddingRequest, EmbeddingResponse};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
