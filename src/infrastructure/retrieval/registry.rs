//! Process-wide slot holding the current retriever

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::retrieval::Retriever;

/// Single-writer, multi-reader cell for the retriever bound by ingestion.
///
/// Readers get a cloned `Arc`, so a handle obtained before a rebind or a clear
/// stays usable for as long as the reader holds it.
#[derive(Debug, Default)]
pub struct RetrieverRegistry {
    slot: RwLock<Option<Arc<dyn Retriever>>>,
}

impl RetrieverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bound retriever; `None` marks documents as unavailable
    pub async fn set(&self, retriever: Option<Arc<dyn Retriever>>) {
        let bound = retriever.is_some();
        *self.slot.write().await = retriever;
        info!(bound, "Retriever handle updated");
    }

    pub async fn get(&self) -> Option<Arc<dyn Retriever>> {
        self.slot.read().await.clone()
    }

    pub async fn clear(&self) {
        self.set(None).await;
    }

    pub async fn is_bound(&self) -> bool {
        self.slot.read().await.is_some()
    }
}
