//! Domain layer - Core entities, seams and workflow logic

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod prompt;
pub mod rag;
pub mod retrieval;
pub mod study;
pub mod web_search;

pub use error::DomainError;
pub use llm::{LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole};
pub use prompt::{PromptPipelines, PromptTemplate};
pub use rag::{
    CritiqueStatus, NextNode, QueryClassification, RagNode, RagRunResult, RagWorkflow,
    RelevanceGrade, WorkflowState, MAX_ATTEMPTS,
};
pub use retrieval::{Document, Retriever, SearchResult, VectorIndex};
pub use web_search::WebSearchTool;
