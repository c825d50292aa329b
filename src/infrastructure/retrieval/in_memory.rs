//! In-memory cosine-similarity index with optional JSON snapshots on disk

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest};
use crate::domain::retrieval::{Document, SearchResult, VectorIndex};
use crate::domain::DomainError;

const SNAPSHOT_FILE: &str = "index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedChunk {
    document: Document,
    vector: Vec<f32>,
}

/// Brute-force vector index. Query text is embedded with the same provider used at ingestion.
#[derive(Debug)]
pub struct InMemoryVectorIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: RwLock<Vec<IndexedChunk>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryVectorIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
            snapshot_path: None,
        }
    }

    /// Persist every change to `{dir}/index.json`
    pub fn with_snapshot_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.snapshot_path = Some(dir.as_ref().join(SNAPSHOT_FILE));
        self
    }

    /// Load a previous snapshot if one exists. Returns the number of chunks loaded.
    pub async fn load_snapshot(&self) -> Result<usize, DomainError> {
        let Some(ref path) = self.snapshot_path else {
            return Ok(0);
        };

        if !tokio::fs::try_exists(path).await? {
            return Ok(0);
        }

        let raw = tokio::fs::read(path).await?;
        let loaded: Vec<IndexedChunk> = serde_json::from_slice(&raw).map_err(|e| {
            DomainError::storage(format!("Corrupt index snapshot {}: {}", path.display(), e))
        })?;

        let count = loaded.len();
        *self.entries.write().await = loaded;
        info!(path = %path.display(), chunks = count, "Loaded index snapshot");

        Ok(count)
    }

    async fn persist(&self, entries: &[IndexedChunk]) -> Result<(), DomainError> {
        let Some(ref path) = self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_vec(entries)
            .map_err(|e| DomainError::storage(format!("Failed to serialize index: {}", e)))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), chunks = entries.len(), "Wrote index snapshot");
        Ok(())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(self.embedder.model(), text);
        self.embedder
            .embed(request)
            .await?
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider(self.embedder.provider_name(), "Empty embedding response"))
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn add(&self, documents: Vec<Document>, vectors: Vec<Vec<f32>>) -> Result<usize, DomainError> {
        if documents.len() != vectors.len() {
            return Err(DomainError::validation(format!(
                "{} documents but {} vectors",
                documents.len(),
                vectors.len()
            )));
        }

        let added = documents.len();
        let mut entries = self.entries.write().await;
        let previous = entries.len();
        entries.extend(
            documents
                .into_iter()
                .zip(vectors)
                .map(|(document, vector)| IndexedChunk { document, vector }),
        );
        if let Err(e) = self.persist(&entries).await {
            entries.truncate(previous);
            return Err(e);
        }

        Ok(added)
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<SearchResult>, DomainError> {
        if k == 0 || self.entries.read().await.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_query(text).await?;
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &IndexedChunk)> = entries
            .iter()
            .map(|entry| (cosine_similarity(&query_vector, &entry.vector), entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, entry)| SearchResult::from((entry.document.clone(), score)))
            .collect())
    }

    async fn reset(&self) -> Result<(), DomainError> {
        self.entries.write().await.clear();

        if let Some(ref path) = self.snapshot_path {
            if tokio::fs::try_exists(path).await? {
                tokio::fs::remove_file(path).await?;
            }
        }

        Ok(())
    }

    async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}
