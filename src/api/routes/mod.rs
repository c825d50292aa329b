//! Document, chat and study endpoints under `/api`

pub mod documents;
pub mod rag;
pub mod study;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use super::state::AppState;

/// Uploaded batches may hold several textbook chapters
pub const UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/documents",
            post(documents::upload_documents).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/documents/clear", post(documents::clear_documents))
        .route("/rag/chat", post(rag::chat))
        .route("/study/questions", post(study::generate_questions))
        .route("/study/summary", post(study::summarize_topic))
}
