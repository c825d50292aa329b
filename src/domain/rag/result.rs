//! Outcome of one workflow run

use serde::{Deserialize, Serialize};

use super::{RagNode, WorkflowState};

/// Answer returned when a run ends without any generation
pub const NO_ANSWER: &str = "Could not generate an answer.";

/// One executed node in the run trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeExecution {
    pub node: RagNode,
    pub duration_ms: u64,
    /// Short description of what the node decided
    pub note: String,
}

/// Result of `RagWorkflow::run`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagRunResult {
    pub answer: String,
    pub final_state: WorkflowState,
    pub steps: Vec<NodeExecution>,
    pub execution_time_ms: u64,
}

impl RagRunResult {
    pub fn new(final_state: WorkflowState, steps: Vec<NodeExecution>, execution_time_ms: u64) -> Self {
        let answer = final_state
            .generation
            .clone()
            .unwrap_or_else(|| NO_ANSWER.to_string());

        Self {
            answer,
            final_state,
            steps,
            execution_time_ms,
        }
    }

    pub fn count_of(&self, node: RagNode) -> usize {
        self.steps.iter().filter(|s| s.node == node).count()
    }

    pub fn visited(&self) -> Vec<RagNode> {
        self.steps.iter().map(|s| s.node).collect()
    }
}
