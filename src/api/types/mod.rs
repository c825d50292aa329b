//! Request/response types for the HTTP API

pub mod documents;
pub mod error;
pub mod json;
pub mod rag;
pub mod study;

pub use documents::{ClearResponse, IngestQuery, IngestResponse};
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use rag::{ChatRequest, ChatResponse};
pub use study::{QuestionsResponse, SummaryResponse};
