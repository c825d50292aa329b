//! Per-question workflow state

use serde::{Deserialize, Serialize};

/// Routing category assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClassification {
    /// Not classified yet
    Unknown,
    DocumentBased,
    RequiresWebSearch,
    AmbiguousOrGeneral,
}

impl QueryClassification {
    /// Parse a normalised classifier label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "document_based" => Some(Self::DocumentBased),
            "requires_web_search" => Some(Self::RequiresWebSearch),
            "ambiguous_or_general" => Some(Self::AmbiguousOrGeneral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::DocumentBased => "document_based",
            Self::RequiresWebSearch => "requires_web_search",
            Self::AmbiguousOrGeneral => "ambiguous_or_general",
        }
    }
}

/// Grader verdict over the current document set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceGrade {
    Yes,
    No,
    Unknown,
}

impl RelevanceGrade {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }
}

/// Critic verdict over the current generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CritiqueStatus {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

impl CritiqueStatus {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

/// Record threaded through one run of the workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub question: String,
    pub documents: Vec<String>,
    pub summarized_context: Option<String>,
    pub relevance_grade: RelevanceGrade,
    pub query_rewrite_attempted: bool,
    pub query_classification: QueryClassification,
    pub generation: Option<String>,
    pub critique_status: CritiqueStatus,
    pub attempt_count: u32,
}

impl WorkflowState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            documents: Vec::new(),
            summarized_context: None,
            relevance_grade: RelevanceGrade::Unknown,
            query_rewrite_attempted: false,
            query_classification: QueryClassification::Unknown,
            generation: None,
            critique_status: CritiqueStatus::None,
            attempt_count: 0,
        }
    }

    /// Clear per-round outputs before a critique-driven re-retrieval.
    ///
    /// The rewrite flag, the attempt counter and the critic verdict survive.
    pub fn reset_for_retry(&mut self) {
        self.generation = None;
        self.summarized_context = None;
        self.documents.clear();
        self.relevance_grade = RelevanceGrade::Unknown;
    }

    /// Whether the real answer path (summarize then generate) applies
    pub fn has_relevant_documents(&self) -> bool {
        self.relevance_grade == RelevanceGrade::Yes && !self.documents.is_empty()
    }

    /// Shape checks that must hold between nodes. Returns every violation found.
    pub fn validate(&self, max_attempts: u32) -> Vec<String> {
        let mut violations = Vec::new();

        if self.attempt_count > max_attempts {
            violations.push(format!(
                "attempt_count {} exceeds max attempts {}",
                self.attempt_count, max_attempts
            ));
        }
        if self.summarized_context.is_some() && self.relevance_grade != RelevanceGrade::Yes {
            violations.push(format!(
                "summarized_context present with relevance grade '{}'",
                self.relevance_grade.as_str()
            ));
        }
        if self.critique_status == CritiqueStatus::Pass && self.generation.is_none() {
            violations.push("critique PASS without a generation".to_string());
        }
        if self.critique_status != CritiqueStatus::None && self.attempt_count == 0 {
            violations.push(format!(
                "critique status '{}' recorded before any critique ran",
                self.critique_status.as_str()
            ));
        }

        violations
    }
}
