//! Study question and topic summary requests

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_NUM_QUESTIONS: u32 = 5;
pub const MAX_NUM_QUESTIONS: u32 = 50;
pub const DEFAULT_DIFFICULTY: u8 = 10;
pub const MAX_DIFFICULTY: u8 = 20;

fn default_num_questions() -> u32 {
    DEFAULT_NUM_QUESTIONS
}

fn default_difficulty() -> u8 {
    DEFAULT_DIFFICULTY
}

fn validate_topic(topic: &str) -> Result<(), DomainError> {
    if topic.trim().is_empty() {
        return Err(DomainError::validation("Topic is required"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionGenerationRequest {
    pub topic: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    /// 1 (recall) to 20 (expert)
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

impl QuestionGenerationRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            num_questions: DEFAULT_NUM_QUESTIONS,
            difficulty: DEFAULT_DIFFICULTY,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_topic(&self.topic)?;

        if !(1..=MAX_NUM_QUESTIONS).contains(&self.num_questions) {
            return Err(DomainError::validation(format!(
                "num_questions must be between 1 and {}",
                MAX_NUM_QUESTIONS
            )));
        }
        if !(1..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(DomainError::validation(format!(
                "difficulty must be between 1 and {}",
                MAX_DIFFICULTY
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummaryRequest {
    pub topic: String,
    #[serde(default)]
    pub generate_handwriting: bool,
}

impl TopicSummaryRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_topic(&self.topic)
    }

    /// Topic reduced to characters safe for a file name
    pub fn safe_topic(&self) -> String {
        self.topic
            .trim()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
            .collect::<String>()
            .trim()
            .replace(' ', "_")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    pub summary: String,
    /// Public URL of the rendered note, when one was produced
    pub handwriting_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let request: QuestionGenerationRequest =
            serde_json::from_str(r#"{"topic": "elasticity"}"#).unwrap();
        assert_eq!(request.num_questions, 5);
        assert_eq!(request.difficulty, 10);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_rejects_blank_topic() {
        assert!(QuestionGenerationRequest::new("   ").validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_difficulty() {
        let mut request = QuestionGenerationRequest::new("stress");
        request.difficulty = 21;
        assert!(request.validate().is_err());
        request.difficulty = 0;
        assert!(request.validate().is_err());
        request.difficulty = 20;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_safe_topic() {
        let request = TopicSummaryRequest {
            topic: " Young's modulus / steel ".into(),
            generate_handwriting: true,
        };
        assert_eq!(request.safe_topic(), "Youngs_modulus__steel");
    }
}
