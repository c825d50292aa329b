//! RAG workflow domain - state, nodes and transitions

mod node;
mod result;
mod state;
mod workflow;

pub use node::{
    next_node, route_after_classification, route_after_critique, route_after_grading, NextNode,
    RagNode, MAX_ATTEMPTS,
};
pub use result::{NodeExecution, RagRunResult, NO_ANSWER};
pub use state::{CritiqueStatus, QueryClassification, RelevanceGrade, WorkflowState};
pub use workflow::RagWorkflow;

#[cfg(test)]
pub use workflow::MockRagWorkflow;
