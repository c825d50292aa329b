//! docmind
//!
//! Document question answering over uploaded PDFs and notes:
//! - Ingestion into an embedded vector index
//! - A self-correcting retrieval workflow with query rewriting, web search
//!   fallback and answer critique
//! - Study questions and handwritten-style topic notes

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{error, info, warn};

use api::{AppState, ComponentStatus, MediaMount};
use domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use domain::{LlmProvider, LlmRequest, PromptPipelines, WebSearchTool};
use infrastructure::{
    embedding::OpenAiEmbeddingProvider,
    ingestion::IngestionPipeline,
    llm::{HttpClient, OpenAiProvider},
    prompts::LlmPromptPipelines,
    rag::{OrchestratorConfig, OrchestratorContext, RagOrchestrator},
    rendering::SvgNoteRenderer,
    retrieval::{InMemoryVectorIndex, IndexRetriever, RetrieverRegistry},
    services::{DocumentService, StoragePaths, StudyService},
    web_search::GoogleCustomSearchTool,
};

const SELF_TEST_PROMPT: &str = "Quick self-introduction in one sentence.";
const EMBEDDING_PROBE: &str = "Embedding self-test.";

/// Whether the vector index is persisted under `storage.index_dir`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPersistence {
    Snapshot,
    Ephemeral,
}

/// Everything the HTTP server and the CLI need, wired from configuration
pub struct Components {
    pub retrievers: Arc<RetrieverRegistry>,
    pub documents: Arc<DocumentService>,
    pub study: Arc<StudyService>,
    pub workflow: Arc<RagOrchestrator>,
    pub status: ComponentStatus,
}

impl Components {
    pub fn into_state(self, config: &AppConfig) -> AppState {
        AppState::new(self.documents, self.study, self.workflow, self.retrievers)
            .with_components(self.status)
            .with_media(MediaMount::new(
                &config.storage.media_dir,
                &config.storage.media_url,
            ))
    }
}

/// Build the services from configuration.
///
/// The language and embedding models are probed once. A model that fails its
/// probe is reported as unavailable and the workflow runs without pipelines.
pub async fn build_components(
    config: &AppConfig,
    persistence: IndexPersistence,
) -> anyhow::Result<Components> {
    let client = HttpClient::with_timeout(config.llm.request_timeout())?;

    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(
        client.clone(),
        &config.llm.base_url,
        config.llm.api_key.clone(),
    ));
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbeddingProvider::new(
        client.clone(),
        &config.embedding.base_url,
        &config.embedding.model,
        config.embedding.api_key.clone(),
    ));

    let (llm_ready, embedding_ready) = if config.llm.verify_on_startup {
        tokio::join!(
            verify_llm(llm.as_ref(), &config.llm.model),
            verify_embedding(embedder.as_ref())
        )
    } else {
        (true, true)
    };

    let retrievers = Arc::new(RetrieverRegistry::new());
    let index = match persistence {
        IndexPersistence::Snapshot => {
            InMemoryVectorIndex::new(embedder.clone()).with_snapshot_dir(&config.storage.index_dir)
        }
        IndexPersistence::Ephemeral => InMemoryVectorIndex::new(embedder.clone()),
    };
    let index = Arc::new(index);

    if persistence == IndexPersistence::Snapshot {
        match index.load_snapshot().await {
            Ok(0) => {}
            Ok(chunks) => {
                let retriever = IndexRetriever::new(index.clone(), config.retrieval.top_k);
                retrievers.set(Some(Arc::new(retriever))).await;
                info!(chunks, "Restored index snapshot");
            }
            Err(e) => warn!(error = %e, "Failed to load index snapshot, starting empty"),
        }
    }

    let pipelines: Option<Arc<dyn PromptPipelines>> = if llm_ready {
        Some(Arc::new(LlmPromptPipelines::new(
            llm.clone(),
            &config.llm.model,
            config.llm.temperature,
        )))
    } else {
        None
    };

    let web_search: Option<Arc<dyn WebSearchTool>> =
        config.web_search.credentials().map(|(key, engine_id)| {
            let tool = GoogleCustomSearchTool::new(client.clone(), key, engine_id)
                .with_endpoint(&config.web_search.base_url)
                .with_num_results(config.web_search.num_results);
            Arc::new(tool) as Arc<dyn WebSearchTool>
        });
    if web_search.is_none() {
        info!("Web search not configured, web questions fall back to the documents");
    }

    let mut context = OrchestratorContext::new(retrievers.clone());
    if let Some(pipelines) = &pipelines {
        context = context.with_pipelines(pipelines.clone());
    }
    if let Some(tool) = &web_search {
        context = context.with_web_search(tool.clone());
    }

    let mut orchestrator_config =
        OrchestratorConfig::default().with_max_attempts(config.retrieval.max_attempts);
    if let Some(timeout) = config.retrieval.node_timeout() {
        orchestrator_config = orchestrator_config.with_node_timeout(timeout);
    }
    let workflow = Arc::new(RagOrchestrator::with_config(context, orchestrator_config));

    let pipeline = IngestionPipeline::new(index, embedder)
        .with_chunking(config.retrieval.chunking());
    let documents = DocumentService::new(
        pipeline,
        retrievers.clone(),
        StoragePaths {
            index_dir: config.storage.index_dir.clone(),
            temp_dir: config.storage.temp_dir.clone(),
            media_dir: config.storage.media_dir.clone(),
        },
    )
    .with_top_k(config.retrieval.top_k, config.retrieval.batch_top_k);
    documents.ensure_directories().await?;

    let study = StudyService::new(
        pipelines,
        retrievers.clone(),
        &config.storage.media_dir,
        &config.storage.media_url,
    )
    .with_renderer(Arc::new(SvgNoteRenderer::new(config.handwriting.style())));

    let status = ComponentStatus {
        llm: llm_ready,
        embedding: embedding_ready,
        web_search: web_search.is_some(),
    };
    info!(
        llm = status.llm,
        embedding = status.embedding,
        web_search = status.web_search,
        "Components initialized"
    );

    Ok(Components {
        retrievers,
        documents: Arc::new(documents),
        study: Arc::new(study),
        workflow,
        status,
    })
}

/// Application state for the HTTP server
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let components = build_components(config, IndexPersistence::Snapshot).await?;
    Ok(components.into_state(config))
}

async fn verify_llm(llm: &dyn LlmProvider, model: &str) -> bool {
    let request = LlmRequest::builder()
        .user(SELF_TEST_PROMPT)
        .max_tokens(64)
        .build();

    match llm.chat(model, request).await {
        Ok(response) => {
            info!(model = %model, reply = %response.content().trim(), "Language model ready");
            true
        }
        Err(e) => {
            error!(model = %model, error = %e, "Language model self-test failed");
            false
        }
    }
}

async fn verify_embedding(embedder: &dyn EmbeddingProvider) -> bool {
    let request = EmbeddingRequest::single(embedder.model(), EMBEDDING_PROBE);

    match embedder.embed(request).await {
        Ok(_) => {
            info!(model = %embedder.model(), "Embedding model ready");
            true
        }
        Err(e) => {
            error!(model = %embedder.model(), error = %e, "Embedding self-test failed");
            false
        }
    }
}
