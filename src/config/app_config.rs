use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::ingestion::ChunkingConfig;
use crate::domain::rag::MAX_ATTEMPTS;
use crate::domain::retrieval::{BATCH_TOP_K, DEFAULT_TOP_K};
use crate::infrastructure::rendering::NoteStyle;
use crate::infrastructure::web_search::GOOGLE_SEARCH_URL;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub storage: StorageConfig,
    pub web_search: WebSearchConfig,
    pub handwriting: HandwritingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Prometheus exporter served at `path`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// OpenAI-compatible chat endpoint (Ollama by default)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    /// Send a one-sentence prompt at startup and disable chat if it fails
    pub verify_on_startup: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub batch_top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_attempts: u32,
    pub node_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub index_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub media_dir: PathBuf,
    /// Public prefix under which `media_dir` is served
    pub media_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub num_results: u32,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandwritingConfig {
    pub font_path: PathBuf,
    pub font_size: u32,
    pub text_color: String,
    pub background_color: String,
    pub max_width_pixels: u32,
    pub padding: u32,
    pub line_spacing_factor: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3:8b-instruct-q4_K_M".to_string(),
            api_key: None,
            temperature: 0.1,
            request_timeout_secs: 120,
            verify_on_startup: true,
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "all-minilm".to_string(),
            api_key: None,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            batch_top_k: BATCH_TOP_K,
            chunk_size: 800,
            chunk_overlap: 100,
            max_attempts: MAX_ATTEMPTS,
            node_timeout_secs: None,
        }
    }
}

impl RetrievalConfig {
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn node_timeout(&self) -> Option<Duration> {
        self.node_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from("./chroma_db_multi_app"),
            temp_dir: PathBuf::from("./pdf_temp_files"),
            media_dir: PathBuf::from("./media"),
            media_url: "/media/".to_string(),
        }
    }
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            num_results: 5,
            base_url: GOOGLE_SEARCH_URL.to_string(),
        }
    }
}

impl WebSearchConfig {
    /// Both credentials, when configured and non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_key.as_deref(), self.engine_id.as_deref()) {
            (Some(key), Some(cx)) if !key.is_empty() && !cx.is_empty() => Some((key, cx)),
            _ => None,
        }
    }
}

impl Default for HandwritingConfig {
    fn default() -> Self {
        let style = NoteStyle::default();
        Self {
            font_path: style.font_path,
            font_size: style.font_size,
            text_color: style.text_color,
            background_color: style.background_color,
            max_width_pixels: style.max_width_pixels,
            padding: style.padding,
            line_spacing_factor: style.line_spacing_factor,
        }
    }
}

impl HandwritingConfig {
    pub fn style(&self) -> NoteStyle {
        NoteStyle {
            font_path: self.font_path.clone(),
            font_size: self.font_size,
            text_color: self.text_color.clone(),
            background_color: self.background_color.clone(),
            max_width_pixels: self.max_width_pixels,
            padding: self.padding,
            line_spacing_factor: self.line_spacing_factor,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: AppConfig = config.try_deserialize()?;
        app.apply_search_env(|name| std::env::var(name).ok());
        app.validate()?;

        Ok(app)
    }

    /// Fall back to the conventional Google variable names
    fn apply_search_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.web_search.api_key.is_none() {
            self.web_search.api_key = lookup("GOOGLE_API_KEY");
        }
        if self.web_search.engine_id.is_none() {
            self.web_search.engine_id = lookup("GOOGLE_CSE_ID");
        }
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.retrieval.max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "retrieval.max_attempts must be at least 1".to_string(),
            ));
        }
        self.retrieval
            .chunking()
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))
    }
}
