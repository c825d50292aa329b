//! Chunks stored in the vector index and the hits returned from it

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A chunk of text to be indexed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// File name the chunk was cut from
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }
}

/// A ranked hit from a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub content: String,
    /// Cosine similarity, higher is closer
    pub score: f32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
            metadata: HashMap::new(),
        }
    }

    pub fn with_all_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

impl From<(Document, f32)> for SearchResult {
    fn from((document, score): (Document, f32)) -> Self {
        SearchResult::new(document.id, document.content, score).with_all_metadata(document.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_source() {
        let doc = Document::new("c1", "text").with_metadata("source", json!("physics.pdf"));
        assert_eq!(doc.source(), Some("physics.pdf"));
        assert_eq!(Document::new("c2", "text").source(), None);
    }

    #[test]
    fn test_search_result_keeps_metadata() {
        let doc = Document::new("c1", "stress").with_metadata("chunk_index", json!(4));
        let hit: SearchResult = (doc, 0.9).into();
        assert_eq!(hit.content, "stress");
        assert_eq!(hit.metadata["chunk_index"], json!(4));
    }
}
