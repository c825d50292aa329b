//! Document upload and clear payloads

use serde::{Deserialize, Serialize};

use crate::domain::ingestion::{IngestionMode, IngestionOutcome};

pub const STATUS_SUCCESS: &str = "success";

/// `?replace=true` starts a fresh batch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestQuery {
    #[serde(default)]
    pub replace: bool,
}

impl IngestQuery {
    pub fn mode(&self) -> IngestionMode {
        if self.replace {
            IngestionMode::Replace
        } else {
            IngestionMode::Append
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub message: String,
    pub processed_files: Vec<String>,
}

impl From<IngestionOutcome> for IngestResponse {
    fn from(outcome: IngestionOutcome) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: outcome.message,
            processed_files: outcome.processed_files,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub status: String,
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: "All documents and generated files have been cleared.".to_string(),
        }
    }
}
