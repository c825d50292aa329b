//! Health, readiness and liveness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    fn up(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: None,
        }
    }

    fn down(name: &str, status: HealthStatus, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: Some(message.to_string()),
        }
    }
}

/// Returns 200 while the process is serving
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

/// Reports the language model, the embedding model and the retriever.
///
/// Missing documents only degrade readiness. With neither model up the
/// service cannot do anything useful and answers 503.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let components = state.components;

    let llm = if components.llm {
        HealthCheck::up("llm")
    } else {
        HealthCheck::down("llm", HealthStatus::Unhealthy, "Language model is not available")
    };
    let embedding = if components.embedding {
        HealthCheck::up("embedding")
    } else {
        HealthCheck::down(
            "embedding",
            HealthStatus::Unhealthy,
            "Embedding model is not available",
        )
    };
    let retriever = if state.retrievers.is_bound().await {
        HealthCheck::up("retriever")
    } else {
        HealthCheck::down("retriever", HealthStatus::Degraded, "No documents ingested")
    };

    let overall_status = if !components.llm && !components.embedding {
        HealthStatus::Unhealthy
    } else if [&llm, &embedding, &retriever]
        .iter()
        .any(|check| check.status != HealthStatus::Healthy)
    {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(vec![llm, embedding, retriever]),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::testing::{idle_state, read_json};
    use crate::api::state::ComponentStatus;
    use crate::domain::retrieval::StaticRetriever;

    async fn ready(state: AppState) -> (StatusCode, serde_json::Value) {
        let response = Router::new()
            .route("/ready", get(ready_check))
            .with_state(state)
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, read_json(response).await)
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }

    #[tokio::test]
    async fn test_ready_without_documents_is_degraded() {
        let (status, json) = ready(idle_state()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"][2]["name"], "retriever");
        assert_eq!(json["checks"][2]["message"], "No documents ingested");
    }

    #[tokio::test]
    async fn test_ready_all_components_up() {
        let state = idle_state();
        state
            .retrievers
            .set(Some(Arc::new(StaticRetriever::empty())))
            .await;

        let (status, json) = ready(state).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_without_models_is_unavailable() {
        let state = idle_state().with_components(ComponentStatus::default());

        let (status, json) = ready(state).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["checks"][0]["status"], "unhealthy");
    }
}
