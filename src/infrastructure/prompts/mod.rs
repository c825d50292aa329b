//! Prompt pipeline implementations

mod llm_pipelines;
mod templates;

pub use llm_pipelines::LlmPromptPipelines;
