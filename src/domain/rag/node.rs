//! Workflow nodes and the pure transition functions between them

use serde::{Deserialize, Serialize};

use super::state::{CritiqueStatus, QueryClassification, RelevanceGrade, WorkflowState};

/// Critique-driven attempts allowed per question
pub const MAX_ATTEMPTS: u32 = 2;

/// A step of the RAG workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagNode {
    ClassifyQuery,
    WebSearch,
    Retrieve,
    GradeDocuments,
    TransformQuery,
    SummarizeContext,
    Generate,
    CritiqueAnswer,
}

impl RagNode {
    pub const ENTRY: RagNode = RagNode::ClassifyQuery;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClassifyQuery => "classify_query",
            Self::WebSearch => "web_search",
            Self::Retrieve => "retrieve",
            Self::GradeDocuments => "grade_documents",
            Self::TransformQuery => "transform_query",
            Self::SummarizeContext => "summarize_context",
            Self::Generate => "generate",
            Self::CritiqueAnswer => "critique_answer",
        }
    }
}

impl std::fmt::Display for RagNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the driver goes after a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextNode {
    Node(RagNode),
    /// Critique failed with budget left; state must be reset before re-retrieval
    Retry,
    End,
}

pub fn route_after_classification(state: &WorkflowState, has_web_search: bool) -> RagNode {
    match state.query_classification {
        QueryClassification::RequiresWebSearch if has_web_search => RagNode::WebSearch,
        _ => RagNode::Retrieve,
    }
}

pub fn route_after_grading(state: &WorkflowState) -> RagNode {
    if state.relevance_grade == RelevanceGrade::Yes {
        RagNode::SummarizeContext
    } else if !state.query_rewrite_attempted {
        RagNode::TransformQuery
    } else {
        RagNode::Generate
    }
}

pub fn route_after_critique(state: &WorkflowState, max_attempts: u32) -> NextNode {
    if state.critique_status == CritiqueStatus::Pass {
        NextNode::End
    } else if state.attempt_count < max_attempts {
        NextNode::Retry
    } else {
        NextNode::End
    }
}

/// Full transition table
pub fn next_node(
    node: RagNode,
    state: &WorkflowState,
    has_web_search: bool,
    max_attempts: u32,
) -> NextNode {
    match node {
        RagNode::ClassifyQuery => NextNode::Node(route_after_classification(state, has_web_search)),
        RagNode::WebSearch | RagNode::Retrieve => NextNode::Node(RagNode::GradeDocuments),
        RagNode::GradeDocuments => NextNode::Node(route_after_grading(state)),
        RagNode::TransformQuery => NextNode::Node(RagNode::Retrieve),
        RagNode::SummarizeContext => NextNode::Node(RagNode::Generate),
        RagNode::Generate => NextNode::Node(RagNode::CritiqueAnswer),
        RagNode::CritiqueAnswer => route_after_critique(state, max_attempts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(f: impl FnOnce(&mut WorkflowState)) -> WorkflowState {
        let mut state = WorkflowState::new("q");
        f(&mut state);
        state
    }

    #[test]
    fn test_classification_routes() {
        let doc = state_with(|s| s.query_classification = QueryClassification::DocumentBased);
        let web = state_with(|s| s.query_classification = QueryClassification::RequiresWebSearch);
        let general =
            state_with(|s| s.query_classification = QueryClassification::AmbiguousOrGeneral);

        assert_eq!(route_after_classification(&doc, true), RagNode::Retrieve);
        assert_eq!(route_after_classification(&general, true), RagNode::Retrieve);
        assert_eq!(route_after_classification(&web, true), RagNode::WebSearch);
    }

    #[test]
    fn test_web_search_without_tool_routes_like_document_based() {
        let web = state_with(|s| s.query_classification = QueryClassification::RequiresWebSearch);
        let doc = state_with(|s| s.query_classification = QueryClassification::DocumentBased);

        assert_eq!(
            route_after_classification(&web, false),
            route_after_classification(&doc, false)
        );
    }

    #[test]
    fn test_grading_routes() {
        let relevant = state_with(|s| s.relevance_grade = RelevanceGrade::Yes);
        let first_miss = state_with(|s| s.relevance_grade = RelevanceGrade::No);
        let second_miss = state_with(|s| {
            s.relevance_grade = RelevanceGrade::No;
            s.query_rewrite_attempted = true;
        });
        let ungraded = state_with(|s| s.relevance_grade = RelevanceGrade::Unknown);

        assert_eq!(route_after_grading(&relevant), RagNode::SummarizeContext);
        assert_eq!(route_after_grading(&first_miss), RagNode::TransformQuery);
        assert_eq!(route_after_grading(&second_miss), RagNode::Generate);
        assert_eq!(route_after_grading(&ungraded), RagNode::TransformQuery);
    }

    #[test]
    fn test_critique_routes() {
        let pass = state_with(|s| {
            s.critique_status = CritiqueStatus::Pass;
            s.attempt_count = 1;
        });
        let fail_once = state_with(|s| {
            s.critique_status = CritiqueStatus::Fail;
            s.attempt_count = 1;
        });
        let fail_twice = state_with(|s| {
            s.critique_status = CritiqueStatus::Fail;
            s.attempt_count = 2;
        });

        assert_eq!(route_after_critique(&pass, MAX_ATTEMPTS), NextNode::End);
        assert_eq!(route_after_critique(&fail_once, MAX_ATTEMPTS), NextNode::Retry);
        assert_eq!(route_after_critique(&fail_twice, MAX_ATTEMPTS), NextNode::End);
    }

    #[test]
    fn test_unconditional_edges() {
        let state = WorkflowState::new("q");
        assert_eq!(
            next_node(RagNode::WebSearch, &state, true, MAX_ATTEMPTS),
            NextNode::Node(RagNode::GradeDocuments)
        );
        assert_eq!(
            next_node(RagNode::TransformQuery, &state, true, MAX_ATTEMPTS),
            NextNode::Node(RagNode::Retrieve)
        );
        assert_eq!(
            next_node(RagNode::SummarizeContext, &state, true, MAX_ATTEMPTS),
            NextNode::Node(RagNode::Generate)
        );
        assert_eq!(
            next_node(RagNode::Generate, &state, true, MAX_ATTEMPTS),
            NextNode::Node(RagNode::CritiqueAnswer)
        );
    }
}
