//! Study questions and topic summaries over the ingested documents

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::prompt::{PromptPipelines, CONTEXT_SEPARATOR};
use crate::domain::study::{
    NoteRenderer, QuestionGenerationRequest, TopicSummary, TopicSummaryRequest,
};
use crate::domain::DomainError;
use crate::infrastructure::retrieval::RetrieverRegistry;

#[cfg(test)]
use mockall::automock;

pub const NO_DOCUMENTS: &str = "No documents processed. Please ingest documents first.";
const HANDWRITING_FAILED: &str = "\n\n(Error: Custom handwriting image generation failed.)";

/// Trait for the study service (for dependency injection)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StudyServiceTrait: Send + Sync + std::fmt::Debug {
    async fn generate_questions(
        &self,
        request: QuestionGenerationRequest,
    ) -> Result<String, DomainError>;

    async fn summarize_topic(&self, request: TopicSummaryRequest)
        -> Result<TopicSummary, DomainError>;
}

#[derive(Debug)]
pub struct StudyService {
    pipelines: Option<Arc<dyn PromptPipelines>>,
    retrievers: Arc<RetrieverRegistry>,
    renderer: Option<Arc<dyn NoteRenderer>>,
    media_dir: PathBuf,
    media_url: String,
}

impl StudyService {
    pub fn new(
        pipelines: Option<Arc<dyn PromptPipelines>>,
        retrievers: Arc<RetrieverRegistry>,
        media_dir: impl Into<PathBuf>,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            pipelines,
            retrievers,
            renderer: None,
            media_dir: media_dir.into(),
            media_url: media_url.into(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn NoteRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Check preconditions and gather the context for `topic`
    async fn context_for(
        &self,
        topic: &str,
    ) -> Result<(Arc<dyn PromptPipelines>, String), DomainError> {
        let retriever = self
            .retrievers
            .get()
            .await
            .ok_or_else(|| DomainError::validation(NO_DOCUMENTS))?;
        let pipelines = self
            .pipelines
            .clone()
            .ok_or_else(|| DomainError::configuration("Language model is not available"))?;

        let hits = retriever.retrieve(topic).await?;
        if hits.is_empty() {
            return Err(DomainError::not_found(format!(
                "Could not find info about '{}'",
                topic
            )));
        }

        let context = hits
            .into_iter()
            .map(|hit| hit.content)
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        Ok((pipelines, context))
    }

    /// Render `summary` and return the public URL of the note
    async fn render_note(&self, summary: &str, safe_topic: &str) -> Result<String, DomainError> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No note renderer configured"))?;

        tokio::fs::create_dir_all(&self.media_dir).await?;

        let file_name = format!(
            "summary_{}_handwriting.{}",
            safe_topic,
            renderer.file_extension()
        );
        renderer.render(summary, &self.media_dir.join(&file_name)).await?;

        Ok(format!("{}{}", self.media_url, file_name))
    }
}

#[async_trait]
impl StudyServiceTrait for StudyService {
    async fn generate_questions(
        &self,
        request: QuestionGenerationRequest,
    ) -> Result<String, DomainError> {
        request.validate()?;
        let topic = request.topic.trim();

        let (pipelines, context) = self.context_for(topic).await?;
        let questions = pipelines
            .generate_study_questions(&context, topic, request.num_questions, request.difficulty)
            .await?;

        info!(
            topic = %topic,
            num_questions = request.num_questions,
            difficulty = request.difficulty,
            "Generated study questions"
        );
        Ok(questions)
    }

    async fn summarize_topic(
        &self,
        request: TopicSummaryRequest,
    ) -> Result<TopicSummary, DomainError> {
        request.validate()?;
        let topic = request.topic.trim();

        let (pipelines, context) = self.context_for(topic).await?;
        let mut summary = pipelines.summarize_topic(&context, topic).await?;

        let mut handwriting_url = None;
        if request.generate_handwriting {
            match self.render_note(&summary, &request.safe_topic()).await {
                Ok(url) => handwriting_url = Some(url),
                Err(e) => {
                    warn!(topic = %topic, error = %e, "Handwriting rendering failed");
                    summary.push_str(HANDWRITING_FAILED);
                }
            }
        }

        Ok(TopicSummary {
            summary,
            handwriting_url,
        })
    }
}
