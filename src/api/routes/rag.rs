//! Question answering handler

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatRequest, ChatResponse, Json};
use crate::infrastructure::services::NO_DOCUMENTS;

/// POST /api/rag/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError::bad_request("Question cannot be empty").with_param("question"));
    }
    if !state.retrievers.is_bound().await {
        return Err(ApiError::bad_request(NO_DOCUMENTS).with_code("no_documents"));
    }
    if !state.components.llm {
        return Err(ApiError::unavailable("Language model is not available"));
    }

    info!(question = %question, "Running RAG workflow");
    let result = state.workflow.run(question.to_string()).await;

    info!(
        critique = result.final_state.critique_status.as_str(),
        attempts = result.final_state.attempt_count,
        steps = result.steps.len(),
        execution_time_ms = result.execution_time_ms,
        "RAG workflow finished"
    );

    Ok(Json(result.into()))
}
