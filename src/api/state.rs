//! Application state shared by the handlers

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::rag::RagWorkflow;
use crate::infrastructure::retrieval::RetrieverRegistry;
use crate::infrastructure::services::{DocumentServiceTrait, StudyServiceTrait};

/// Which external models came up at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    pub llm: bool,
    pub embedding: bool,
    pub web_search: bool,
}

/// Directory of rendered notes and the URL prefix they are served under
#[derive(Debug, Clone)]
pub struct MediaMount {
    pub dir: PathBuf,
    pub url_prefix: String,
}

impl MediaMount {
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Route the directory is nested under, if the prefix is a local path
    pub fn route(&self) -> Option<String> {
        let trimmed = self.url_prefix.trim_end_matches('/');
        if trimmed.starts_with('/') && trimmed.len() > 1 {
            Some(trimmed.to_string())
        } else {
            None
        }
    }
}

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentServiceTrait>,
    pub study: Arc<dyn StudyServiceTrait>,
    pub workflow: Arc<dyn RagWorkflow>,
    pub retrievers: Arc<RetrieverRegistry>,
    pub components: ComponentStatus,
    pub media: MediaMount,
}

impl AppState {
    pub fn new(
        documents: Arc<dyn DocumentServiceTrait>,
        study: Arc<dyn StudyServiceTrait>,
        workflow: Arc<dyn RagWorkflow>,
        retrievers: Arc<RetrieverRegistry>,
    ) -> Self {
        Self {
            documents,
            study,
            workflow,
            retrievers,
            components: ComponentStatus::default(),
            media: MediaMount::new("./media", "/media/"),
        }
    }

    pub fn with_components(mut self, components: ComponentStatus) -> Self {
        self.components = components;
        self
    }

    pub fn with_media(mut self, media: MediaMount) -> Self {
        self.media = media;
        self
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_route() {
        assert_eq!(MediaMount::new("m", "/media/").route().as_deref(), Some("/media"));
        assert_eq!(MediaMount::new("m", "/static/notes").route().as_deref(), Some("/static/notes"));
        assert!(MediaMount::new("m", "https://cdn.example.com/").route().is_none());
        assert!(MediaMount::new("m", "/").route().is_none());
    }
}
