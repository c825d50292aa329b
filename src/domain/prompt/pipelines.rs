//! Single-purpose prompt pipelines built on a language model

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Separator between chunks handed to the relevance grader
pub const GRADING_SEPARATOR: &str = "\n---\n";

/// Separator between chunks used as answer or summary context
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Text transformations used by the RAG workflow and the study tools.
///
/// Every operation returns the trimmed model output. Label-producing operations
/// (`classify_query`, `grade_documents`) return it lower-cased without quotes and
/// `critique_answer` returns it upper-cased without quotes. Mapping the text onto
/// the label set is the caller's job.
#[async_trait]
pub trait PromptPipelines: Send + Sync + Debug {
    async fn classify_query(&self, question: &str) -> Result<String, DomainError>;

    async fn grade_documents(&self, question: &str, documents: &[String]) -> Result<String, DomainError>;

    async fn rewrite_query(&self, question: &str) -> Result<String, DomainError>;

    async fn summarize_context(&self, question: &str, documents: &[String]) -> Result<String, DomainError>;

    async fn generate_answer(&self, context: &str, question: &str) -> Result<String, DomainError>;

    /// Reply explaining that the documents do not cover the question
    async fn generate_insufficient_answer(&self, question: &str) -> Result<String, DomainError>;

    async fn critique_answer(
        &self,
        question: &str,
        documents: &[String],
        generation: &str,
    ) -> Result<String, DomainError>;

    async fn generate_study_questions(
        &self,
        context: &str,
        topic: &str,
        num_questions: u32,
        difficulty: u8,
    ) -> Result<String, DomainError>;

    async fn summarize_topic(&self, context: &str, topic: &str) -> Result<String, DomainError>;
}

fn strip_quotes(raw: &str) -> String {
    raw.trim().chars().filter(|c| !matches!(c, '"' | '\'' | '`')).collect()
}

/// Normalise a classifier or grader reply for label matching
pub fn normalize_label(raw: &str) -> String {
    strip_quotes(raw).trim().to_lowercase()
}

/// Normalise a critic reply for verdict matching
pub fn normalize_verdict(raw: &str) -> String {
    strip_quotes(raw).trim().to_uppercase()
}

#[cfg(test)]
pub mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use super::*;

    /// Per-operation scripted replies; an empty queue yields an error
    #[derive(Debug, Default)]
    pub struct ScriptedPipelines {
        replies: Mutex<HashMap<&'static str, VecDeque<Result<String, String>>>>,
        calls: Mutex<Vec<(&'static str, String)>>,
    }

    impl ScriptedPipelines {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on(self, operation: &'static str, reply: &str) -> Self {
            self.push(operation, Ok(reply.to_string()));
            self
        }

        pub fn on_error(self, operation: &'static str, error: &str) -> Self {
            self.push(operation, Err(error.to_string()));
            self
        }

        /// Operation names in call order
        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().iter().map(|(op, _)| *op).collect()
        }

        /// Primary input of each call to `operation`
        pub fn inputs_of(&self, operation: &str) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(op, _)| *op == operation)
                .map(|(_, input)| input.clone())
                .collect()
        }

        fn push(&self, operation: &'static str, reply: Result<String, String>) {
            self.replies
                .lock()
                .unwrap()
                .entry(operation)
                .or_default()
                .push_back(reply);
        }

        fn next(&self, operation: &'static str, input: &str) -> Result<String, DomainError> {
            self.calls.lock().unwrap().push((operation, input.to_string()));
            match self
                .replies
                .lock()
                .unwrap()
                .get_mut(operation)
                .and_then(|q| q.pop_front())
            {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(error)) => Err(DomainError::provider("scripted", error)),
                None => Err(DomainError::provider(
                    "scripted",
                    format!("no scripted reply for {}", operation),
                )),
            }
        }
    }

    #[async_trait]
    impl PromptPipelines for ScriptedPipelines {
        async fn classify_query(&self, question: &str) -> Result<String, DomainError> {
            self.next("classify_query", question)
        }

        async fn grade_documents(&self, question: &str, _documents: &[String]) -> Result<String, DomainError> {
            self.next("grade_documents", question)
        }

        async fn rewrite_query(&self, question: &str) -> Result<String, DomainError> {
            self.next("rewrite_query", question)
        }

        async fn summarize_context(&self, _question: &str, documents: &[String]) -> Result<String, DomainError> {
            self.next("summarize_context", &documents.join(CONTEXT_SEPARATOR))
        }

        async fn generate_answer(&self, context: &str, _question: &str) -> Result<String, DomainError> {
            self.next("generate_answer", context)
        }

        async fn generate_insufficient_answer(&self, question: &str) -> Result<String, DomainError> {
            self.next("generate_insufficient_answer", question)
        }

        async fn critique_answer(
            &self,
            _question: &str,
            _documents: &[String],
            generation: &str,
        ) -> Result<String, DomainError> {
            self.next("critique_answer", generation)
        }

        async fn generate_study_questions(
            &self,
            context: &str,
            _topic: &str,
            _num_questions: u32,
            _difficulty: u8,
        ) -> Result<String, DomainError> {
            self.next("generate_study_questions", context)
        }

        async fn summarize_topic(&self, context: &str, _topic: &str) -> Result<String, DomainError> {
            self.next("summarize_topic", context)
        }
    }
}
