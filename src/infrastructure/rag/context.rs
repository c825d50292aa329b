//! Dependencies and limits for the RAG orchestrator

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::prompt::PromptPipelines;
use crate::domain::rag::MAX_ATTEMPTS;
use crate::domain::web_search::WebSearchTool;
use crate::infrastructure::retrieval::RetrieverRegistry;

/// Longest first pass: classify, retrieve, grade, transform, retrieve, grade,
/// summarize, generate, critique.
const FIRST_PASS_STEPS: usize = 9;

/// Longest critique retry: retrieve, grade, summarize, generate, critique.
const RETRY_STEPS: usize = 5;

/// Limits for one run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Critique-driven attempts per question
    pub max_attempts: u32,
    /// Applied to every model, index and search call
    pub node_timeout: Option<Duration>,
    /// Hard stop on executed nodes; raised to the reachable maximum if lower
    pub max_steps: usize,
}

impl OrchestratorConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_node_timeout(mut self, timeout: Duration) -> Self {
        self.node_timeout = Some(timeout);
        self
    }

    /// Executed-node ceiling for a run
    pub fn step_budget(&self) -> usize {
        let reachable =
            FIRST_PASS_STEPS + RETRY_STEPS * (self.max_attempts.saturating_sub(1) as usize);
        self.max_steps.max(reachable)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            node_timeout: None,
            max_steps: 32,
        }
    }
}

/// Collaborators built once at startup and shared by every run.
///
/// `pipelines` is `None` when the language model failed its startup check;
/// `web_search` is `None` when no search credentials are configured.
#[derive(Clone)]
pub struct OrchestratorContext {
    pub pipelines: Option<Arc<dyn PromptPipelines>>,
    pub retrievers: Arc<RetrieverRegistry>,
    pub web_search: Option<Arc<dyn WebSearchTool>>,
}

impl OrchestratorContext {
    pub fn new(retrievers: Arc<RetrieverRegistry>) -> Self {
        Self {
            pipelines: None,
            retrievers,
            web_search: None,
        }
    }

    pub fn with_pipelines(mut self, pipelines: Arc<dyn PromptPipelines>) -> Self {
        self.pipelines = Some(pipelines);
        self
    }

    pub fn with_web_search(mut self, tool: Arc<dyn WebSearchTool>) -> Self {
        self.web_search = Some(tool);
        self
    }
}

impl fmt::Debug for OrchestratorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorContext")
            .field("pipelines", &self.pipelines.is_some())
            .field("retrievers", &self.retrievers)
            .field("web_search", &self.web_search.is_some())
            .finish()
    }
}
