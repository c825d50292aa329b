use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::retrieval::{Retriever, SearchResult, VectorIndex};
use crate::domain::DomainError;

/// Retriever over a vector index with a fixed default depth
#[derive(Debug, Clone)]
pub struct IndexRetriever {
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl IndexRetriever {
    pub fn new(index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        Self { index, top_k }
    }
}

#[async_trait]
impl Retriever for IndexRetriever {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>, DomainError> {
        self.index.query(text, k).await
    }

    fn top_k(&self) -> usize {
        self.top_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::{EmbeddingProvider, MockEmbeddingProvider};
    use crate::domain::retrieval::Document;
    use crate::infrastructure::retrieval::InMemoryVectorIndex;

    #[tokio::test]
    async fn test_retrieve_uses_bound_depth() {
        let embedder = Arc::new(MockEmbeddingProvider::new(32));
        let index = Arc::new(InMemoryVectorIndex::new(embedder.clone()));

        let texts: Vec<String> = (0..6).map(|i| format!("chunk number {}", i)).collect();
        let vectors = embedder
            .embed_texts(texts.clone())
            .await
            .unwrap();
        let documents = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Document::new(i.to_string(), t.clone()))
            .collect();
        index.add(documents, vectors).await.unwrap();

        let retriever = IndexRetriever::new(index, 5);
        assert_eq!(retriever.retrieve("chunk").await.unwrap().len(), 5);
        assert_eq!(retriever.query("chunk", 2).await.unwrap().len(), 2);
    }
}
