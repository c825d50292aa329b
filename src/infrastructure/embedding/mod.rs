//! Embedding providers

mod openai;

pub use openai::OpenAiEmbeddingProvider;
