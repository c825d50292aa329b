//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

/// Text embedding backend
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    /// Model name requests are issued against
    fn model(&self) -> &str;

    /// Embed `texts` with this provider's model, vectors in input order
    async fn embed_texts(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let response = self.embed(EmbeddingRequest::batch(self.model(), texts)).await?;
        Ok(response.into_vectors())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::embedding::Embedding;

    /// Bag-of-words hashing embedder: texts sharing words get similar vectors
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        dimensions: usize,
        error: Option<String>,
    }

    impl MockEmbeddingProvider {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        fn vectorize(&self, text: &str) -> Vec<f32> {
            let mut vector = vec![0.0; self.dimensions];
            for word in text.split_whitespace() {
                let word = word
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase();
                if word.is_empty() {
                    continue;
                }
                let hash = word
                    .bytes()
                    .fold(5381u64, |acc, b| acc.wrapping_mul(33).wrapping_add(b as u64));
                vector[(hash % self.dimensions as u64) as usize] += 1.0;
            }
            vector
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock", error));
            }

            let embeddings = request
                .texts
                .iter()
                .enumerate()
                .map(|(index, text)| Embedding {
                    index,
                    vector: self.vectorize(text),
                })
                .collect();

            Ok(EmbeddingResponse::new(request.model, embeddings))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }

        fn model(&self) -> &str {
            "mock-embedding"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::embedding::cosine_similarity;

        #[tokio::test]
        async fn test_mock_provider_batch_input() {
            let provider = MockEmbeddingProvider::new(64);
            let request =
                EmbeddingRequest::batch("mock-embedding", vec!["Hello".into(), "World".into()]);

            let response = provider.embed(request).await.unwrap();

            assert_eq!(response.data.len(), 2);
            assert_eq!(response.data[1].vector.len(), 64);
        }

        #[tokio::test]
        async fn test_shared_words_are_closer() {
            let provider = MockEmbeddingProvider::new(256);
            let vectors = provider
                .embed(EmbeddingRequest::batch(
                    "mock-embedding",
                    vec![
                        "young's modulus of steel".into(),
                        "what is young's modulus".into(),
                        "photosynthesis in plants".into(),
                    ],
                ))
                .await
                .unwrap()
                .into_vectors();

            assert!(
                cosine_similarity(&vectors[0], &vectors[1])
                    > cosine_similarity(&vectors[2], &vectors[1])
            );
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new(8).with_error("API error");
            let result = provider
                .embed(EmbeddingRequest::single("mock-embedding", "Hello"))
                .await;
            assert!(result.is_err());
        }
    }
}
