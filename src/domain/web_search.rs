//! Optional web search capability

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Turns a query into a textual digest of search results
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSearchTool: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<String, DomainError>;
}
