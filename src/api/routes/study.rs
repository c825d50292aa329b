//! Study question and topic summary handlers

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QuestionsResponse, SummaryResponse};
use crate::domain::study::{QuestionGenerationRequest, TopicSummaryRequest};

/// POST /api/study/questions
pub async fn generate_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionGenerationRequest>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let questions = state.study.generate_questions(request).await?;
    Ok(Json(QuestionsResponse::new(questions)))
}

/// POST /api/study/summary
pub async fn summarize_topic(
    State(state): State<AppState>,
    Json(request): Json<TopicSummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = state.study.summarize_topic(request).await?;
    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode, Router};
    use tower::ServiceExt;

    use crate::api::routes::create_api_router;
    use crate::api::state::testing::{read_json, state};
    use crate::domain::rag::MockRagWorkflow;
    use crate::domain::study::TopicSummary;
    use crate::domain::DomainError;
    use crate::infrastructure::retrieval::RetrieverRegistry;
    use crate::infrastructure::services::{MockDocumentServiceTrait, MockStudyServiceTrait};

    fn router(study: MockStudyServiceTrait) -> Router {
        create_api_router().with_state(state(
            MockDocumentServiceTrait::new(),
            study,
            MockRagWorkflow::new(),
            Arc::new(RetrieverRegistry::new()),
        ))
    }

    fn post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_questions_apply_defaults() {
        let mut study = MockStudyServiceTrait::new();
        study
            .expect_generate_questions()
            .withf(|request| {
                request.topic == "stress" && request.num_questions == 5 && request.difficulty == 10
            })
            .times(1)
            .returning(|_| Ok("1. Define stress.".to_string()));

        let response = router(study)
            .oneshot(post("/study/questions", r#"{"topic": "stress"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["questions"], "1. Define stress.");
    }

    #[tokio::test]
    async fn test_questions_topic_not_found() {
        let mut study = MockStudyServiceTrait::new();
        study.expect_generate_questions().returning(|_| {
            Err(DomainError::not_found("Could not find info about 'optics'"))
        });

        let response = router(study)
            .oneshot(post(
                "/study/questions",
                r#"{"topic": "optics", "num_questions": 3, "difficulty": 15}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary_with_handwriting_url() {
        let mut study = MockStudyServiceTrait::new();
        study
            .expect_summarize_topic()
            .withf(|request| request.generate_handwriting)
            .returning(|_| {
                Ok(TopicSummary {
                    summary: "Hooke's law holds below the elastic limit.".to_string(),
                    handwriting_url: Some(
                        "/media/summary_Hookes_law_handwriting.svg".to_string(),
                    ),
                })
            });

        let response = router(study)
            .oneshot(post(
                "/study/summary",
                r#"{"topic": "Hooke's law", "generate_handwriting": true}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(
            json["handwriting_url"],
            "/media/summary_Hookes_law_handwriting.svg"
        );
    }

    #[tokio::test]
    async fn test_summary_without_model() {
        let mut study = MockStudyServiceTrait::new();
        study
            .expect_summarize_topic()
            .returning(|_| Err(DomainError::configuration("Language model is not available")));

        let response = router(study)
            .oneshot(post("/study/summary", r#"{"topic": "strain"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
