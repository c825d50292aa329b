//! Prompt domain - templates and pipelines

mod pipelines;
mod template;

pub use pipelines::{
    normalize_label, normalize_verdict, PromptPipelines, CONTEXT_SEPARATOR, GRADING_SEPARATOR,
};
pub use template::{PromptTemplate, PromptVariable, TemplateError};

#[cfg(test)]
pub use pipelines::mock::ScriptedPipelines;
