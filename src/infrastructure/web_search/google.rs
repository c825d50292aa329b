use async_trait::async_trait;
use tracing::debug;

use crate::domain::{DomainError, WebSearchTool};
use crate::infrastructure::llm::HttpClientTrait;

pub const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const DEFAULT_NUM_RESULTS: u32 = 5;
const ITEM_SEPARATOR: &str = "\n\n---\n\n";
const NO_RESULTS: &str = "No relevant search results found.";

/// Google Programmable Search (Custom Search JSON API)
#[derive(Debug)]
pub struct GoogleCustomSearchTool<C: HttpClientTrait> {
    client: C,
    api_key: String,
    engine_id: String,
    endpoint: String,
    num_results: u32,
}

impl<C: HttpClientTrait> GoogleCustomSearchTool<C> {
    pub fn new(client: C, api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            endpoint: GOOGLE_SEARCH_URL.to_string(),
            num_results: DEFAULT_NUM_RESULTS,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_num_results(mut self, num_results: u32) -> Self {
        self.num_results = num_results.clamp(1, 10);
        self
    }

    fn digest(body: &serde_json::Value) -> String {
        let Some(items) = body["items"].as_array().filter(|items| !items.is_empty()) else {
            return NO_RESULTS.to_string();
        };

        items
            .iter()
            .map(|item| {
                let field = |name: &str| item[name].as_str().unwrap_or("N/A").to_string();
                format!(
                    "Title: {}\nLink: {}\nSnippet: {}",
                    field("title"),
                    field("link"),
                    field("snippet")
                )
            })
            .collect::<Vec<_>>()
            .join(ITEM_SEPARATOR)
    }
}

#[async_trait]
impl<C: HttpClientTrait> WebSearchTool for GoogleCustomSearchTool<C> {
    fn name(&self) -> &str {
        "google_custom_search"
    }

    async fn search(&self, query: &str) -> Result<String, DomainError> {
        let num = self.num_results.to_string();
        let params = [
            ("key", self.api_key.as_str()),
            ("cx", self.engine_id.as_str()),
            ("q", query),
            ("num", num.as_str()),
        ];

        let body = self
            .client
            .get_json(&self.endpoint, &params)
            .await
            .map_err(|e| DomainError::provider("google", e.to_string()))?;

        let digest = Self::digest(&body);
        debug!(query = %query, chars = digest.len(), "Web search completed");
        Ok(digest)
    }
}
