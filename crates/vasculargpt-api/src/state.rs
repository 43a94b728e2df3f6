//! Application state wiring the answering pipeline and session store.
//!
//! `AppState` is generic over the pipeline so HTTP tests can substitute a
//! scripted one; the binary pins it to [`ConcretePipeline`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;
use tracing::{info, warn};

use vasculargpt_core::pipeline::{AnswerPipeline, ConversationalRetrievalPipeline, PipelineSettings};
use vasculargpt_core::retrieval::retriever::Retriever;
use vasculargpt_core::secret::{SecretService, OPENAI_API_KEY, PINECONE_API_KEY};
use vasculargpt_core::session::{SessionController, SessionStore};
use vasculargpt_infra::embedding::openai::OpenAiEmbedder;
use vasculargpt_infra::http_client;
use vasculargpt_infra::llm::create_chat_provider;
use vasculargpt_infra::secret::chain::build_secret_service;
use vasculargpt_infra::secret::file::FileSecretProvider;
use vasculargpt_infra::vector::pinecone::{PineconeIndex, PineconeOptions};
use vasculargpt_types::config::AppConfig;

/// Retriever pinned to the hosted embedding service and Pinecone.
pub type ConcreteRetriever = Retriever<OpenAiEmbedder, PineconeIndex>;

pub type ConcretePipeline = ConversationalRetrievalPipeline<ConcreteRetriever>;

/// Shared application state used by both CLI commands and HTTP handlers.
pub struct AppState<P: AnswerPipeline = ConcretePipeline> {
    pub controller: Arc<SessionController<P>>,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl<P: AnswerPipeline> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            sessions: self.sessions.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<P: AnswerPipeline> AppState<P> {
    /// Wrap an already-built pipeline.
    pub fn new(pipeline: P, config: AppConfig) -> Self {
        let ttl = Duration::from_secs(config.server.session_ttl_secs);
        Self {
            controller: Arc::new(SessionController::new(pipeline)),
            sessions: SessionStore::new(ttl),
            config: Arc::new(config),
        }
    }
}

impl AppState {
    /// Resolve secrets, bind the vector index and build the pipeline.
    ///
    /// Binding the index is the only network call made here; a missing or
    /// unreachable index aborts startup.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let secrets_file = FileSecretProvider::load(Path::new(&config.server.secrets_path))?;
        let secrets = build_secret_service(secrets_file);

        let index_name = secrets.index_name();
        let client = http_client(Duration::from_secs(config.retriever.request_timeout_secs))
            .context("failed to build HTTP client")?;

        let embedder = OpenAiEmbedder::new(
            client.clone(),
            api_key(&secrets, OPENAI_API_KEY),
            config.retriever.embedding_model.clone(),
        )
        .with_base_url(config.retriever.embedding_base_url.clone());

        let index = PineconeIndex::connect(
            client.clone(),
            api_key(&secrets, PINECONE_API_KEY),
            &index_name,
            PineconeOptions::from(&config.retriever),
        )
        .await
        .with_context(|| format!("failed to bind vector index '{index_name}'"))?;

        let retriever = Retriever::new(embedder, index).with_top_k(config.retriever.top_k);

        let llm = create_chat_provider(
            &config.llm,
            secrets.get_secret(OPENAI_API_KEY).map(SecretString::from),
            client,
        );
        let settings = PipelineSettings::from_config(&config.llm, &config.pipeline);
        let pipeline = ConversationalRetrievalPipeline::new(llm, retriever, settings);

        info!(
            index = %index_name,
            top_k = config.retriever.top_k,
            model = %config.llm.model,
            "Answering pipeline ready"
        );

        Ok(Self::new(pipeline, config))
    }
}

/// Look up an API key; absence is not fatal, the remote call will reject it.
fn api_key(secrets: &SecretService, key: &str) -> SecretString {
    match secrets.get_secret(key) {
        Some(value) => SecretString::from(value),
        None => {
            warn!(key, "API key not set; requests will fail to authenticate");
            SecretString::from(String::new())
        }
    }
}
