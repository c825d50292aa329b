use async_trait::async_trait;

use super::RagRunResult;

#[cfg(test)]
use mockall::automock;

/// Answers one question end to end. Never fails: errors degrade into the answer text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RagWorkflow: Send + Sync {
    async fn run(&self, question: String) -> RagRunResult;
}
