//! Retrieval domain - chunks, vector index and retriever seams

mod document;
mod index;
mod retriever;

pub use document::{Document, SearchResult};
pub use index::VectorIndex;
pub use retriever::{Retriever, BATCH_TOP_K, DEFAULT_TOP_K};

#[cfg(test)]
pub use retriever::mock::StaticRetriever;
