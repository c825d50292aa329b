//! Study tool payloads

use serde::{Deserialize, Serialize};

use super::documents::STATUS_SUCCESS;
use crate::domain::study::TopicSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub status: String,
    pub questions: String,
}

impl QuestionsResponse {
    pub fn new(questions: String) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub status: String,
    pub summary: String,
    pub handwriting_url: Option<String>,
}

impl From<TopicSummary> for SummaryResponse {
    fn from(summary: TopicSummary) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            summary: summary.summary,
            handwriting_url: summary.handwriting_url,
        }
    }
}
