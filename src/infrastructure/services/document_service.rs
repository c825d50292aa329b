//! Document upload and reset service

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::ingestion::{IngestionMode, IngestionOutcome, StagedUpload, UploadedFile};
use crate::domain::DomainError;
use crate::infrastructure::ingestion::IngestionPipeline;
use crate::infrastructure::retrieval::{IndexRetriever, RetrieverRegistry};

#[cfg(test)]
use mockall::automock;

/// Directories owned by the document service
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub index_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub media_dir: PathBuf,
}

impl StoragePaths {
    fn all(&self) -> [&Path; 3] {
        [&self.index_dir, &self.temp_dir, &self.media_dir]
    }
}

/// Trait for the document service (for dependency injection)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentServiceTrait: Send + Sync + std::fmt::Debug {
    async fn ingest(
        &self,
        files: Vec<UploadedFile>,
        mode: IngestionMode,
    ) -> Result<IngestionOutcome, DomainError>;

    /// Drop every indexed chunk and generated file, and unbind the retriever
    async fn clear(&self) -> Result<(), DomainError>;
}

/// Fingerprint of a batch: the sorted file names
fn batch_checksum(file_names: &[String]) -> String {
    let mut sorted = file_names.to_vec();
    sorted.sort();

    let mut hasher = Sha256::new();
    for name in &sorted {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Upload name reduced to its final path component
fn staged_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string()
}

#[derive(Debug)]
pub struct DocumentService {
    pipeline: IngestionPipeline,
    retrievers: Arc<RetrieverRegistry>,
    paths: StoragePaths,
    /// Retriever depth bound after an append and after a replace
    top_k: (usize, usize),
    /// Checksum of the last batch ingested in replace mode. Held for the
    /// whole of an ingestion, which serializes uploads.
    last_batch: Mutex<Option<String>>,
}

impl DocumentService {
    pub fn new(
        pipeline: IngestionPipeline,
        retrievers: Arc<RetrieverRegistry>,
        paths: StoragePaths,
    ) -> Self {
        Self {
            pipeline,
            retrievers,
            paths,
            top_k: (IngestionMode::Append.top_k(), IngestionMode::Replace.top_k()),
            last_batch: Mutex::new(None),
        }
    }

    pub fn with_top_k(mut self, append: usize, replace: usize) -> Self {
        self.top_k = (append.max(1), replace.max(1));
        self
    }

    fn top_k_for(&self, mode: IngestionMode) -> usize {
        match mode {
            IngestionMode::Append => self.top_k.0,
            IngestionMode::Replace => self.top_k.1,
        }
    }

    /// Create the storage directories if they are missing
    pub async fn ensure_directories(&self) -> Result<(), DomainError> {
        for dir in self.paths.all() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Spool uploads to `temp_dir`. The bytes are released once written.
    async fn stage(&self, files: Vec<UploadedFile>) -> Result<Vec<StagedUpload>, DomainError> {
        tokio::fs::create_dir_all(&self.paths.temp_dir).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create {}: {}",
                self.paths.temp_dir.display(),
                e
            ))
        })?;

        let mut staged = Vec::with_capacity(files.len());
        for file in files {
            let path = self
                .paths
                .temp_dir
                .join(format!("{}_{}", Uuid::new_v4(), staged_name(&file.file_name)));
            if let Err(e) = tokio::fs::write(&path, &file.bytes).await {
                self.unstage(&staged).await;
                return Err(DomainError::storage(format!(
                    "Failed to stage {}: {}",
                    file.file_name, e
                )));
            }
            staged.push(StagedUpload::new(file.file_name, path));
        }

        Ok(staged)
    }

    async fn unstage(&self, staged: &[StagedUpload]) {
        for upload in staged {
            if let Err(e) = tokio::fs::remove_file(&upload.path).await {
                warn!(path = %upload.path.display(), error = %e, "Failed to remove staged upload");
            }
        }
    }

    async fn run_pipeline(
        &self,
        staged: &[StagedUpload],
        mode: IngestionMode,
    ) -> Result<usize, DomainError> {
        if mode == IngestionMode::Replace {
            self.pipeline.index().reset().await?;
        }
        self.pipeline.ingest_staged(staged).await
    }
}

#[async_trait]
impl DocumentServiceTrait for DocumentService {
    async fn ingest(
        &self,
        files: Vec<UploadedFile>,
        mode: IngestionMode,
    ) -> Result<IngestionOutcome, DomainError> {
        if files.is_empty() {
            return Err(DomainError::validation("No files uploaded"));
        }

        let names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();
        let checksum = batch_checksum(&names);
        let mut last_batch = self.last_batch.lock().await;

        if mode == IngestionMode::Replace
            && last_batch.as_deref() == Some(checksum.as_str())
            && self.retrievers.is_bound().await
        {
            info!(files = ?names, "Batch already ingested, skipping");
            return Ok(IngestionOutcome::already_processed(names));
        }

        let result = match self.stage(files).await {
            Ok(staged) => {
                let result = self.run_pipeline(&staged, mode).await;
                self.unstage(&staged).await;
                result
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(chunks) => {
                let top_k = self.top_k_for(mode);
                let retriever = IndexRetriever::new(self.pipeline.index().clone(), top_k);
                self.retrievers.set(Some(Arc::new(retriever))).await;
                *last_batch = match mode {
                    IngestionMode::Replace => Some(checksum),
                    IngestionMode::Append => None,
                };

                info!(files = names.len(), chunks, mode = ?mode, top_k, "Retriever bound");
                Ok(IngestionOutcome::ingested(names, chunks))
            }
            Err(e) => {
                error!(error = %e, mode = ?mode, "Ingestion failed");
                if mode == IngestionMode::Replace {
                    self.retrievers.clear().await;
                    *last_batch = None;
                }
                Err(e)
            }
        }
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut last_batch = self.last_batch.lock().await;

        self.pipeline.index().reset().await?;
        self.retrievers.clear().await;
        *last_batch = None;

        for dir in self.paths.all() {
            if tokio::fs::try_exists(dir).await? {
                tokio::fs::remove_dir_all(dir).await.map_err(|e| {
                    DomainError::storage(format!("Failed to remove {}: {}", dir.display(), e))
                })?;
            }
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                DomainError::storage(format!("Failed to recreate {}: {}", dir.display(), e))
            })?;
        }

        info!("Cleared indexed documents and generated files");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::{EmbeddingProvider, MockEmbeddingProvider};
    use crate::infrastructure::retrieval::InMemoryVectorIndex;

    struct Fixture {
        service: DocumentService,
        retrievers: Arc<RetrieverRegistry>,
        _dir: tempfile::TempDir,
    }

    fn fixture_with(embedder: MockEmbeddingProvider) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths {
            index_dir: dir.path().join("index"),
            temp_dir: dir.path().join("tmp"),
            media_dir: dir.path().join("media"),
        };
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
        let index = Arc::new(InMemoryVectorIndex::new(embedder.clone()));
        let retrievers = Arc::new(RetrieverRegistry::new());
        let service = DocumentService::new(
            IngestionPipeline::new(index, embedder),
            retrievers.clone(),
            paths,
        );

        Fixture {
            service,
            retrievers,
            _dir: dir,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MockEmbeddingProvider::new(64))
    }

    fn file(name: &str, text: &str) -> UploadedFile {
        UploadedFile::new(name, text.as_bytes().to_vec())
    }

    #[test]
    fn test_checksum_ignores_order() {
        let a = batch_checksum(&["b.pdf".into(), "a.pdf".into()]);
        let b = batch_checksum(&["a.pdf".into(), "b.pdf".into()]);
        assert_eq!(a, b);
        assert_ne!(a, batch_checksum(&["a.pdf".into()]));
    }

    #[test]
    fn test_staged_name_strips_directories() {
        assert_eq!(staged_name("../../etc/passwd"), "passwd");
        assert_eq!(staged_name("ch8.pdf"), "ch8.pdf");
    }

    #[tokio::test]
    async fn test_replace_binds_batch_depth() {
        let f = fixture();

        let outcome = f
            .service
            .ingest(vec![file("ch8.txt", "Stress is force per area.")], IngestionMode::Replace)
            .await
            .unwrap();

        assert_eq!(outcome.processed_files, vec!["ch8.txt".to_string()]);
        assert!(!outcome.skipped);
        assert_eq!(f.retrievers.get().await.unwrap().top_k(), 5);
    }

    #[tokio::test]
    async fn test_append_binds_default_depth() {
        let f = fixture();

        f.service
            .ingest(vec![file("a.txt", "Strain is dimensionless.")], IngestionMode::Append)
            .await
            .unwrap();

        assert_eq!(f.retrievers.get().await.unwrap().top_k(), 3);
    }

    #[tokio::test]
    async fn test_configured_depths() {
        let Fixture {
            service,
            retrievers,
            _dir,
        } = fixture();
        let service = service.with_top_k(4, 8);

        service
            .ingest(vec![file("a.txt", "Shear modulus.")], IngestionMode::Replace)
            .await
            .unwrap();
        assert_eq!(retrievers.get().await.unwrap().top_k(), 8);

        service
            .ingest(vec![file("b.txt", "Young's modulus.")], IngestionMode::Append)
            .await
            .unwrap();
        assert_eq!(retrievers.get().await.unwrap().top_k(), 4);
    }

    #[tokio::test]
    async fn test_same_replace_batch_is_skipped() {
        let f = fixture();
        let batch = || vec![file("a.txt", "Poisson's ratio."), file("b.txt", "Bulk modulus.")];

        f.service.ingest(batch(), IngestionMode::Replace).await.unwrap();
        let first = f.retrievers.get().await.unwrap();

        let mut reordered = batch();
        reordered.reverse();
        let outcome = f.service.ingest(reordered, IngestionMode::Replace).await.unwrap();

        assert!(outcome.skipped);
        assert_eq!(outcome.message, "Documents already processed. Ready for use!");
        assert!(Arc::ptr_eq(&first, &f.retrievers.get().await.unwrap()));
    }

    #[tokio::test]
    async fn test_replace_discards_previous_chunks() {
        let f = fixture();

        f.service
            .ingest(vec![file("old.txt", "Old material about fluids.")], IngestionMode::Replace)
            .await
            .unwrap();
        f.service
            .ingest(vec![file("new.txt", "New material about solids.")], IngestionMode::Replace)
            .await
            .unwrap();

        let hits = f.retrievers.get().await.unwrap().retrieve("material").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.contains("solids"));
    }

    #[tokio::test]
    async fn test_failed_replace_unbinds() {
        let f = fixture();
        f.service
            .ingest(vec![file("a.txt", "Young's modulus.")], IngestionMode::Append)
            .await
            .unwrap();

        let err = f
            .service
            .ingest(vec![file("empty.txt", "12\n34\n")], IngestionMode::Replace)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Ingestion { .. }));
        assert!(!f.retrievers.is_bound().await);
    }

    #[tokio::test]
    async fn test_failed_append_keeps_binding() {
        let f = fixture();
        f.service
            .ingest(vec![file("a.txt", "Young's modulus.")], IngestionMode::Replace)
            .await
            .unwrap();

        let result = f
            .service
            .ingest(vec![file("deck.pptx", "binary")], IngestionMode::Append)
            .await;

        assert!(result.is_err());
        assert!(f.retrievers.is_bound().await);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_provider_error() {
        let f = fixture_with(MockEmbeddingProvider::new(64).with_error("connection refused"));

        let err = f
            .service
            .ingest(vec![file("a.txt", "Shear modulus.")], IngestionMode::Replace)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Provider { .. }));
        assert!(!f.retrievers.is_bound().await);
    }

    #[tokio::test]
    async fn test_no_files_rejected() {
        let f = fixture();
        let err = f.service.ingest(vec![], IngestionMode::Append).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_staged_files_removed() {
        let f = fixture();
        f.service
            .ingest(vec![file("a.txt", "Elastic limit.")], IngestionMode::Append)
            .await
            .unwrap();

        let mut entries = tokio::fs::read_dir(&f.service.paths.temp_dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unwritable_temp_dir_fails_ingestion() {
        let f = fixture();
        f.service
            .ingest(vec![file("a.txt", "Young's modulus.")], IngestionMode::Append)
            .await
            .unwrap();
        tokio::fs::remove_dir_all(&f.service.paths.temp_dir).await.unwrap();
        tokio::fs::write(&f.service.paths.temp_dir, b"not a directory").await.unwrap();

        let err = f
            .service
            .ingest(vec![file("b.txt", "Shear modulus.")], IngestionMode::Replace)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert!(!f.retrievers.is_bound().await);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let f = fixture();
        f.service.ensure_directories().await.unwrap();
        let note = f.service.paths.media_dir.join("summary_x_handwriting.svg");
        tokio::fs::write(&note, "<svg/>").await.unwrap();
        f.service
            .ingest(vec![file("a.txt", "Elastic limit.")], IngestionMode::Replace)
            .await
            .unwrap();

        f.service.clear().await.unwrap();

        assert!(!f.retrievers.is_bound().await);
        assert_eq!(f.service.pipeline.index().count().await, 0);
        assert!(!note.exists());
        assert!(f.service.paths.media_dir.exists());

        let outcome = f
            .service
            .ingest(vec![file("a.txt", "Elastic limit.")], IngestionMode::Replace)
            .await
            .unwrap();
        assert!(!outcome.skipped);
    }
}
