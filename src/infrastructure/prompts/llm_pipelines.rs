//! Prompt pipelines backed by a chat-completion provider

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::templates;
use crate::domain::prompt::{
    normalize_label, normalize_verdict, PromptPipelines, PromptTemplate, CONTEXT_SEPARATOR,
    GRADING_SEPARATOR,
};
use crate::domain::{DomainError, LlmProvider, LlmRequest};
use crate::infrastructure::observability::record_llm_request;

#[derive(Debug)]
struct Templates {
    classify: PromptTemplate,
    grade: PromptTemplate,
    rewrite: PromptTemplate,
    summarize_context: PromptTemplate,
    answer: PromptTemplate,
    insufficient: PromptTemplate,
    critique: PromptTemplate,
    study_questions: PromptTemplate,
    summarize_topic: PromptTemplate,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            classify: PromptTemplate::parse(templates::CLASSIFY_QUERY),
            grade: PromptTemplate::parse(templates::GRADE_DOCUMENTS),
            rewrite: PromptTemplate::parse(templates::REWRITE_QUERY),
            summarize_context: PromptTemplate::parse(templates::SUMMARIZE_CONTEXT),
            answer: PromptTemplate::parse(templates::GENERATE_ANSWER),
            insufficient: PromptTemplate::parse(templates::INSUFFICIENT_ANSWER),
            critique: PromptTemplate::parse(templates::CRITIQUE_ANSWER),
            study_questions: PromptTemplate::parse(templates::STUDY_QUESTIONS),
            summarize_topic: PromptTemplate::parse(templates::SUMMARIZE_TOPIC),
        }
    }
}

/// `PromptPipelines` over one model at a fixed temperature
#[derive(Debug)]
pub struct LlmPromptPipelines {
    llm: Arc<dyn LlmProvider>,
    model: String,
    temperature: f32,
    templates: Templates,
}

impl LlmPromptPipelines {
    pub fn new(llm: Arc<dyn LlmProvider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature,
            templates: Templates::default(),
        }
    }

    async fn complete(
        &self,
        operation: &'static str,
        template: &PromptTemplate,
        values: HashMap<&str, String>,
    ) -> Result<String, DomainError> {
        let prompt = template
            .render(&values)
            .map_err(|e| DomainError::internal(format!("{}: {}", operation, e)))?;

        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(self.temperature)
            .build();

        let started = Instant::now();
        let result = self.llm.chat(&self.model, request).await;
        record_llm_request(operation, &self.model, started.elapsed(), result.is_ok());

        let response = result?;
        if response.truncated() {
            warn!(operation, model = %self.model, "Completion stopped at the token limit");
        }
        let content = response.content().trim().to_string();
        debug!(operation, output_len = content.len(), "Pipeline completed");

        Ok(content)
    }
}

#[async_trait]
impl PromptPipelines for LlmPromptPipelines {
    async fn classify_query(&self, question: &str) -> Result<String, DomainError> {
        let values = HashMap::from([("question", question.to_string())]);
        let raw = self
            .complete("classify_query", &self.templates.classify, values)
            .await?;
        Ok(normalize_label(&raw))
    }

    async fn grade_documents(&self, question: &str, documents: &[String]) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("question", question.to_string()),
            ("documents", documents.join(GRADING_SEPARATOR)),
        ]);
        let raw = self
            .complete("grade_documents", &self.templates.grade, values)
            .await?;
        Ok(normalize_label(&raw))
    }

    async fn rewrite_query(&self, question: &str) -> Result<String, DomainError> {
        let values = HashMap::from([("question", question.to_string())]);
        self.complete("rewrite_query", &self.templates.rewrite, values)
            .await
    }

    async fn summarize_context(&self, question: &str, documents: &[String]) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("question", question.to_string()),
            ("documents", documents.join(CONTEXT_SEPARATOR)),
        ]);
        self.complete("summarize_context", &self.templates.summarize_context, values)
            .await
    }

    async fn generate_answer(&self, context: &str, question: &str) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("context", context.to_string()),
            ("question", question.to_string()),
        ]);
        self.complete("generate_answer", &self.templates.answer, values)
            .await
    }

    async fn generate_insufficient_answer(&self, question: &str) -> Result<String, DomainError> {
        let values = HashMap::from([("question", question.to_string())]);
        self.complete("generate_insufficient_answer", &self.templates.insufficient, values)
            .await
    }

    async fn critique_answer(
        &self,
        question: &str,
        documents: &[String],
        generation: &str,
    ) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("question", question.to_string()),
            ("context", documents.join(CONTEXT_SEPARATOR)),
            ("generation", generation.to_string()),
        ]);
        let raw = self
            .complete("critique_answer", &self.templates.critique, values)
            .await?;
        Ok(normalize_verdict(&raw))
    }

    async fn generate_study_questions(
        &self,
        context: &str,
        topic: &str,
        num_questions: u32,
        difficulty: u8,
    ) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("context", context.to_string()),
            ("topic", topic.to_string()),
            ("num_questions", num_questions.to_string()),
            ("difficulty", difficulty.to_string()),
        ]);
        self.complete("generate_study_questions", &self.templates.study_questions, values)
            .await
    }

    async fn summarize_topic(&self, context: &str, topic: &str) -> Result<String, DomainError> {
        let values = HashMap::from([
            ("context", context.to_string()),
            ("topic", topic.to_string()),
        ]);
        self.complete("summarize_topic", &self.templates.summarize_topic, values)
            .await
    }
}
