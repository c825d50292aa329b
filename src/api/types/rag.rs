//! Chat payloads

use serde::{Deserialize, Serialize};

use super::documents::STATUS_SUCCESS;
use crate::domain::rag::{NodeExecution, RagRunResult, WorkflowState};

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    pub answer: String,
    pub final_state: WorkflowState,
    pub steps: Vec<NodeExecution>,
    pub execution_time_ms: u64,
}

impl From<RagRunResult> for ChatResponse {
    fn from(result: RagRunResult) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            answer: result.answer,
            final_state: result.final_state,
            steps: result.steps,
            execution_time_ms: result.execution_time_ms,
        }
    }
}
