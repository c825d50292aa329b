//! RAG workflow orchestration

mod context;
mod orchestrator;

pub use context::{OrchestratorConfig, OrchestratorContext};
pub use orchestrator::RagOrchestrator;
