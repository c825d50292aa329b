//! Infrastructure layer - External service implementations

pub mod embedding;
pub mod ingestion;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod prompts;
pub mod rag;
pub mod rendering;
pub mod retrieval;
pub mod services;
pub mod web_search;
