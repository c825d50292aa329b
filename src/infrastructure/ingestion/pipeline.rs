//! Parse, clean, chunk, embed and index uploaded files

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::ingestion::{
    clean_text, ChunkingConfig, ChunkingStrategy, DocumentParser, StagedUpload, UploadedFile,
};
use crate::domain::retrieval::{Document, VectorIndex};
use crate::domain::DomainError;

use super::chunkers::RecursiveChunker;
use super::parsers::{PdfParser, PlainTextParser};

const EMBED_BATCH_SIZE: usize = 64;
const NO_VALID_CHUNKS: &str = "Uploaded documents resulted in no valid chunks";

/// Ingestion pipeline feeding one vector index
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    parsers: Vec<Arc<dyn DocumentParser>>,
    chunker: Arc<dyn ChunkingStrategy>,
    chunking: ChunkingConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl IngestionPipeline {
    pub fn new(index: Arc<dyn VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            parsers: vec![Arc::new(PdfParser::new()), Arc::new(PlainTextParser::new())],
            chunker: Arc::new(RecursiveChunker::new()),
            chunking: ChunkingConfig::default(),
            embedder,
            index,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    fn parser_for(&self, file: &UploadedFile) -> Result<&Arc<dyn DocumentParser>, DomainError> {
        self.parsers
            .iter()
            .find(|p| p.supports_file(file))
            .ok_or_else(|| {
                DomainError::validation(format!("Unsupported file type: {}", file.file_name))
            })
    }

    async fn chunk_file(&self, file: &UploadedFile) -> Result<Vec<Document>, DomainError> {
        let raw = self.parser_for(file)?.parse(file).await?;
        let cleaned = clean_text(&raw);
        let chunks = self.chunker.chunk(&cleaned, &self.chunking)?;

        debug!(
            file = %file.file_name,
            chunker = self.chunker.name(),
            chunks = chunks.len(),
            "Chunked file"
        );

        Ok(chunks
            .into_iter()
            .map(|chunk| {
                Document::new(format!("{}_chunk_{}", file.file_name, chunk.index), chunk.content)
                    .with_metadata("source", serde_json::json!(file.file_name))
                    .with_metadata("chunk_index", serde_json::json!(chunk.index))
            })
            .collect())
    }

    /// Turn files into index-ready chunks. Files that fail are skipped; if
    /// nothing survives, the first failure is returned.
    pub async fn prepare(&self, files: &[UploadedFile]) -> Result<Vec<Document>, DomainError> {
        let results = join_all(files.iter().map(|file| self.chunk_file(file))).await;

        let mut documents = Vec::new();
        let mut first_error = None;

        for (file, result) in files.iter().zip(results) {
            match result {
                Ok(chunks) => documents.extend(chunks),
                Err(e) => {
                    warn!(file = %file.file_name, error = %e, "Skipping file");
                    first_error.get_or_insert(e);
                }
            }
        }

        match (documents.is_empty(), first_error) {
            (true, Some(e)) => Err(e),
            (true, None) => Err(DomainError::ingestion(NO_VALID_CHUNKS)),
            (false, _) => Ok(documents),
        }
    }

    async fn embed(&self, documents: &[Document]) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut vectors = Vec::with_capacity(documents.len());

        for batch in documents.chunks(EMBED_BATCH_SIZE) {
            let texts = batch.iter().map(|d| d.content.clone()).collect();
            vectors.extend(self.embedder.embed_texts(texts).await?);
        }

        Ok(vectors)
    }

    /// Index the files' chunks. Returns the number of chunks added.
    pub async fn ingest(&self, files: &[UploadedFile]) -> Result<usize, DomainError> {
        let documents = self.prepare(files).await?;
        let vectors = self.embed(&documents).await?;
        let added = self.index.add(documents, vectors).await?;

        info!(files = files.len(), chunks = added, "Indexed uploaded files");
        Ok(added)
    }

    /// Index uploads previously spooled to disk
    pub async fn ingest_staged(&self, staged: &[StagedUpload]) -> Result<usize, DomainError> {
        let files = join_all(staged.iter().map(|upload| upload.load()))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        self.ingest(&files).await
    }
}
