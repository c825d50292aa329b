//! Self-correcting RAG workflow driver

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::context::{OrchestratorConfig, OrchestratorContext};
use crate::domain::prompt::CONTEXT_SEPARATOR;
use crate::domain::rag::{
    next_node, CritiqueStatus, NextNode, NodeExecution, QueryClassification, RagNode,
    RagRunResult, RagWorkflow, RelevanceGrade, WorkflowState,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_rag_node, record_rag_run};

const WEB_SEARCH_UNAVAILABLE: &str = "Error: Web search tool not available.";
const PIPELINES_UNAVAILABLE: &str = "Error: LLM or RAG chain not configured.";
const INSUFFICIENT_FALLBACK: &str = "I cannot answer this question based on the provided documents.";
const GENERATION_FAILED: &str = "An error occurred during answer generation.";

/// Runs the classify, retrieve, grade, generate and critique loop for one question
#[derive(Debug, Clone)]
pub struct RagOrchestrator {
    context: OrchestratorContext,
    config: OrchestratorConfig,
}

impl RagOrchestrator {
    pub fn new(context: OrchestratorContext) -> Self {
        Self {
            context,
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(context: OrchestratorContext, config: OrchestratorConfig) -> Self {
        Self { context, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match self.config.node_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| DomainError::timeout(operation, limit.as_millis() as u64))?,
            None => call.await,
        }
    }

    async fn execute(&self, node: RagNode, state: &mut WorkflowState) -> String {
        match node {
            RagNode::ClassifyQuery => self.classify_query(state).await,
            RagNode::WebSearch => self.web_search(state).await,
            RagNode::Retrieve => self.retrieve(state).await,
            RagNode::GradeDocuments => self.grade_documents(state).await,
            RagNode::TransformQuery => self.transform_query(state).await,
            RagNode::SummarizeContext => self.summarize_context(state).await,
            RagNode::Generate => self.generate(state).await,
            RagNode::CritiqueAnswer => self.critique_answer(state).await,
        }
    }

    async fn classify_query(&self, state: &mut WorkflowState) -> String {
        let classification = match &self.context.pipelines {
            None => {
                warn!("Classifier unavailable, treating question as document based");
                QueryClassification::DocumentBased
            }
            Some(pipelines) => {
                match self
                    .guarded("classify_query", pipelines.classify_query(&state.question))
                    .await
                {
                    Ok(label) => QueryClassification::from_label(&label).unwrap_or_else(|| {
                        warn!(label = %label, "Unexpected classification label, defaulting to document_based");
                        QueryClassification::DocumentBased
                    }),
                    Err(e) => {
                        warn!(error = %e, "Classification failed, defaulting to document_based");
                        QueryClassification::DocumentBased
                    }
                }
            }
        };

        state.query_classification = classification;
        classification.as_str().to_string()
    }

    async fn web_search(&self, state: &mut WorkflowState) -> String {
        state.query_rewrite_attempted = true;

        let Some(tool) = &self.context.web_search else {
            warn!("Web search requested but no tool is configured");
            state.documents = vec![WEB_SEARCH_UNAVAILABLE.to_string()];
            state.relevance_grade = RelevanceGrade::No;
            return "tool unavailable".to_string();
        };

        match self.guarded("web_search", tool.search(&state.question)).await {
            Ok(digest) => {
                state.documents = vec![format!("Web Search Results:\n{}", digest)];
                state.relevance_grade = RelevanceGrade::Yes;
                state.summarized_context = None;
                state.generation = None;
                state.critique_status = CritiqueStatus::None;
                "results found".to_string()
            }
            Err(e) => {
                warn!(error = %e, "Web search failed");
                state.documents = vec![format!("Error during web search: {}", e)];
                state.relevance_grade = RelevanceGrade::No;
                "search failed".to_string()
            }
        }
    }

    async fn retrieve(&self, state: &mut WorkflowState) -> String {
        // One handle for the whole node even if ingestion rebinds concurrently
        let Some(retriever) = self.context.retrievers.get().await else {
            warn!("No retriever bound, continuing with an empty document set");
            state.documents.clear();
            state.relevance_grade = RelevanceGrade::No;
            state.generation = None;
            state.critique_status = CritiqueStatus::None;
            return "no retriever bound".to_string();
        };

        state.documents = match self
            .guarded("retrieve", retriever.retrieve(&state.question))
            .await
        {
            Ok(hits) => hits.into_iter().map(|hit| hit.content).collect(),
            Err(e) => {
                warn!(error = %e, "Retrieval failed, continuing with an empty document set");
                Vec::new()
            }
        };
        state.relevance_grade = RelevanceGrade::Unknown;
        state.summarized_context = None;
        state.generation = None;
        state.critique_status = CritiqueStatus::None;

        format!("{} chunks", state.documents.len())
    }

    async fn grade_documents(&self, state: &mut WorkflowState) -> String {
        state.relevance_grade = match &self.context.pipelines {
            _ if state.documents.is_empty() => RelevanceGrade::No,
            None => RelevanceGrade::No,
            Some(pipelines) => {
                match self
                    .guarded(
                        "grade_documents",
                        pipelines.grade_documents(&state.question, &state.documents),
                    )
                    .await
                {
                    Ok(label) => RelevanceGrade::from_label(&label).unwrap_or_else(|| {
                        warn!(label = %label, "Unexpected relevance label, treating as 'no'");
                        RelevanceGrade::No
                    }),
                    Err(e) => {
                        warn!(error = %e, "Grading failed, treating as 'no'");
                        RelevanceGrade::No
                    }
                }
            }
        };

        state.relevance_grade.as_str().to_string()
    }

    async fn transform_query(&self, state: &mut WorkflowState) -> String {
        state.query_rewrite_attempted = true;

        let Some(pipelines) = &self.context.pipelines else {
            return "kept original".to_string();
        };

        match self
            .guarded("rewrite_query", pipelines.rewrite_query(&state.question))
            .await
        {
            Ok(rewritten) if !rewritten.trim().is_empty() => {
                debug!(from = %state.question, to = %rewritten.trim(), "Rewrote question");
                state.question = rewritten.trim().to_string();
                "rewritten".to_string()
            }
            Ok(_) => {
                warn!("Rewrite returned nothing, keeping the original question");
                "kept original".to_string()
            }
            Err(e) => {
                warn!(error = %e, "Rewrite failed, keeping the original question");
                "kept original".to_string()
            }
        }
    }

    async fn summarize_context(&self, state: &mut WorkflowState) -> String {
        if state.documents.is_empty() {
            state.summarized_context = None;
            return "nothing to summarize".to_string();
        }

        let raw = state.documents.join(CONTEXT_SEPARATOR);
        let Some(pipelines) = &self.context.pipelines else {
            state.summarized_context = Some(raw);
            return "raw context".to_string();
        };

        match self
            .guarded(
                "summarize_context",
                pipelines.summarize_context(&state.question, &state.documents),
            )
            .await
        {
            Ok(summary) if !summary.is_empty() => {
                state.summarized_context = Some(summary);
                "summarized".to_string()
            }
            Ok(_) => {
                state.summarized_context = Some(raw);
                "raw context".to_string()
            }
            Err(e) => {
                warn!(error = %e, "Summarization failed, using raw context");
                state.summarized_context = Some(raw);
                "raw context".to_string()
            }
        }
    }

    async fn generate(&self, state: &mut WorkflowState) -> String {
        let Some(pipelines) = &self.context.pipelines else {
            state.generation = Some(PIPELINES_UNAVAILABLE.to_string());
            return "pipelines unavailable".to_string();
        };

        if !state.has_relevant_documents() {
            let answer = match self
                .guarded(
                    "generate_insufficient_answer",
                    pipelines.generate_insufficient_answer(&state.question),
                )
                .await
            {
                Ok(answer) => answer,
                Err(e) => {
                    warn!(error = %e, "Insufficient-information answer failed");
                    INSUFFICIENT_FALLBACK.to_string()
                }
            };
            state.generation = Some(answer);
            return "insufficient information".to_string();
        }

        let context = state
            .summarized_context
            .clone()
            .unwrap_or_else(|| state.documents.join(CONTEXT_SEPARATOR));

        let answer = match self
            .guarded(
                "generate_answer",
                pipelines.generate_answer(&context, &state.question),
            )
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "Answer generation failed");
                GENERATION_FAILED.to_string()
            }
        };
        state.generation = Some(answer);
        "answered".to_string()
    }

    async fn critique_answer(&self, state: &mut WorkflowState) -> String {
        state.attempt_count += 1;

        state.critique_status = match &self.context.pipelines {
            None => CritiqueStatus::Pass,
            Some(pipelines) => match state.generation.as_deref() {
                Some(generation) if !generation.trim().is_empty() && !state.documents.is_empty() => {
                    match self
                        .guarded(
                            "critique_answer",
                            pipelines.critique_answer(&state.question, &state.documents, generation),
                        )
                        .await
                    {
                        Ok(verdict) => CritiqueStatus::from_label(&verdict).unwrap_or_else(|| {
                            warn!(verdict = %verdict, "Unexpected critique verdict, treating as FAIL");
                            CritiqueStatus::Fail
                        }),
                        Err(e) => {
                            warn!(error = %e, "Critique failed, treating as FAIL");
                            CritiqueStatus::Fail
                        }
                    }
                }
                _ => CritiqueStatus::Fail,
            },
        };

        format!("{} (attempt {})", state.critique_status.as_str(), state.attempt_count)
    }
}

#[async_trait]
impl RagWorkflow for RagOrchestrator {
    async fn run(&self, question: String) -> RagRunResult {
        let started = Instant::now();
        let has_web_search = self.context.web_search.is_some();
        let budget = self.config.step_budget();

        let mut state = WorkflowState::new(question);
        let mut steps: Vec<NodeExecution> = Vec::new();
        let mut current = RagNode::ENTRY;

        info!(question = %state.question, "Starting RAG run");

        loop {
            if steps.len() >= budget {
                error!(steps = steps.len(), node = %current, "Step budget exhausted, ending run");
                break;
            }

            let node_started = Instant::now();
            let note = self.execute(current, &mut state).await;
            let elapsed = node_started.elapsed();

            record_rag_node(current.as_str(), elapsed);
            debug!(node = %current, note = %note, duration_ms = elapsed.as_millis() as u64, "Node finished");

            for violation in state.validate(self.config.max_attempts) {
                warn!(node = %current, violation = %violation, "Workflow state check failed");
            }

            steps.push(NodeExecution {
                node: current,
                duration_ms: elapsed.as_millis() as u64,
                note,
            });

            match next_node(current, &state, has_web_search, self.config.max_attempts) {
                NextNode::Node(next) => current = next,
                NextNode::Retry => {
                    info!(attempt = state.attempt_count, "Critique failed, retrying retrieval");
                    state.reset_for_retry();
                    current = RagNode::Retrieve;
                }
                NextNode::End => break,
            }
        }

        let elapsed = started.elapsed();
        record_rag_run(
            state.critique_status == CritiqueStatus::Pass,
            state.attempt_count,
            elapsed,
        );
        info!(
            attempts = state.attempt_count,
            critique = state.critique_status.as_str(),
            steps = steps.len(),
            duration_ms = elapsed.as_millis() as u64,
            "RAG run finished"
        );

        RagRunResult::new(state, steps, elapsed.as_millis() as u64)
    }
}
