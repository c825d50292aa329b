//! Study tools domain - question generation and topic notes

mod renderer;
mod request;

pub use renderer::NoteRenderer;
pub use request::{
    QuestionGenerationRequest, TopicSummary, TopicSummaryRequest, DEFAULT_DIFFICULTY,
    DEFAULT_NUM_QUESTIONS, MAX_DIFFICULTY, MAX_NUM_QUESTIONS,
};

#[cfg(test)]
pub use renderer::MockNoteRenderer;
