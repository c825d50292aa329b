//! Ingestion modes and results

use serde::{Deserialize, Serialize};

use crate::domain::retrieval::{BATCH_TOP_K, DEFAULT_TOP_K};

/// How new uploads relate to what is already indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionMode {
    /// Add to the current index
    Append,
    /// Discard the current index and start a fresh batch
    Replace,
}

impl IngestionMode {
    /// Retrieval depth bound after ingesting in this mode
    pub fn top_k(&self) -> usize {
        match self {
            Self::Append => DEFAULT_TOP_K,
            Self::Replace => BATCH_TOP_K,
        }
    }
}

/// Result of a successful ingestion call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionOutcome {
    pub message: String,
    pub processed_files: Vec<String>,
    pub chunk_count: usize,
    /// The same batch was already indexed and nothing was done
    pub skipped: bool,
}

impl IngestionOutcome {
    pub fn ingested(processed_files: Vec<String>, chunk_count: usize) -> Self {
        Self {
            message: format!(
                "Successfully ingested {} file(s). Documents are ready!",
                processed_files.len()
            ),
            processed_files,
            chunk_count,
            skipped: false,
        }
    }

    pub fn already_processed(processed_files: Vec<String>) -> Self {
        Self {
            message: "Documents already processed. Ready for use!".to_string(),
            processed_files,
            chunk_count: 0,
            skipped: true,
        }
    }
}
