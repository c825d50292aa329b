//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, EmbeddingConfig, HandwritingConfig, LlmConfig, LogFormat, LoggingConfig, MetricsConfig,
    RetrievalConfig, ServerConfig, StorageConfig, WebSearchConfig,
};
