//! Shared application state.
//!
//! `AppState` wires the provider, the vector store, the chat graph and the
//! transcript store together, and is cloned into every handler.

use std::env;
use std::sync::Arc;

use thiserror::Error;

use crate::core::config::{AppPaths, Settings};
use crate::graph::{build_chat_graph, GraphRuntime, NodeContext};
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::rag::{RagStore, SqliteRagStore};
use crate::transcript::TranscriptStore;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("graph error: {0}")]
    Graph(String),
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Arc<Settings>,
    pub llm: Arc<dyn LlmProvider>,
    pub store: Arc<dyn RagStore>,
    pub transcripts: TranscriptStore,
    pub graph: Arc<GraphRuntime>,
}

impl AppState {
    pub async fn initialize(paths: AppPaths) -> Result<Self, InitializationError> {
        let settings =
            Settings::load(&paths).map_err(|e| InitializationError::Config(e.to_string()))?;

        let api_key =
            env::var("OPENAI_API_KEY").map_err(|_| InitializationError::MissingApiKey)?;
        let llm: Arc<dyn LlmProvider> =
            Arc::new(OpenAiProvider::new(settings.openai.base_url.clone(), api_key));

        let store = SqliteRagStore::with_path(paths.store_path.clone())
            .await
            .map_err(|e| InitializationError::Store(e.to_string()))?;
        let store: Arc<dyn RagStore> = Arc::new(store);

        match store.embedding_model().await {
            Ok(Some(model)) if model != settings.openai.embedding_model => {
                tracing::warn!(
                    "store was built with embedding model '{}' but '{}' is configured; \
                     re-run ingestion before querying",
                    model,
                    settings.openai.embedding_model
                );
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("vector store is empty; run the ingest binary to index documents");
            }
            Err(e) => {
                tracing::warn!("could not read store metadata: {}", e);
            }
        }

        let graph =
            build_chat_graph().map_err(|e| InitializationError::Graph(e.to_string()))?;

        Ok(Self {
            paths: Arc::new(paths),
            settings: Arc::new(settings),
            llm,
            store,
            transcripts: TranscriptStore::new(),
            graph: Arc::new(graph),
        })
    }

    /// Collaborators for a graph run.
    pub fn node_context(&self) -> NodeContext {
        NodeContext {
            llm: self.llm.clone(),
            store: self.store.clone(),
            settings: self.settings.clone(),
        }
    }
}
