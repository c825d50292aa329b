//! Document upload and clear handlers

use axum::extract::{multipart::MultipartError, Multipart, Query, State};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ClearResponse, IngestQuery, IngestResponse, Json};
use crate::domain::ingestion::UploadedFile;

const FILES_FIELD: &str = "files";

/// POST /api/documents?replace=bool
pub async fn upload_documents(
    State(state): State<AppState>,
    Query(query): Query<IngestQuery>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    if !state.components.embedding {
        return Err(ApiError::unavailable("Embedding model is not available"));
    }

    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }
        let file_name = match field.file_name() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => continue,
        };
        let bytes = field.bytes().await.map_err(multipart_error)?;
        files.push(UploadedFile::new(file_name, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No files uploaded").with_param(FILES_FIELD));
    }

    let mode = query.mode();
    info!(files = files.len(), mode = ?mode, "Received document upload");

    let outcome = state.documents.ingest(files, mode).await?;
    Ok(Json(outcome.into()))
}

/// POST /api/documents/clear
pub async fn clear_documents(
    State(state): State<AppState>,
) -> Result<Json<ClearResponse>, ApiError> {
    state.documents.clear().await?;
    info!("Cleared documents and generated files");
    Ok(Json(ClearResponse::cleared()))
}

fn multipart_error(err: MultipartError) -> ApiError {
    let mut error = ApiError::bad_request(err.body_text()).with_code("invalid_multipart");
    error.status = err.status();
    error
}
