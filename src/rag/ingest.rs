//! Ingestion pipeline: load → chunk → embed → persist.
//!
//! Embeddings are requested one chunk at a time with no batching or retry;
//! the first failure aborts the run. Nothing is written until every chunk is
//! embedded, and the write itself is one transaction, so a failed run leaves
//! the existing collection untouched.

use std::path::Path;

use crate::core::config::Settings;
use crate::core::errors::ApiError;
use crate::docx;
use crate::llm::LlmProvider;
use crate::rag::{RagStore, RecursiveSplitter, StoredChunk};

#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
}

pub async fn run(
    settings: &Settings,
    provider: &dyn LlmProvider,
    store: &dyn RagStore,
    docs_dir: &Path,
) -> Result<IngestReport, ApiError> {
    let docs = docx::load_docs_dir(docs_dir)?;
    tracing::info!("loaded {} documents from {}", docs.len(), docs_dir.display());

    let splitter = RecursiveSplitter::new(settings.rag.splitter());
    let mut chunks = Vec::new();
    for doc in &docs {
        chunks.extend(splitter.split(&doc.text, &doc.source));
    }
    tracing::info!("split into {} chunks", chunks.len());

    ensure_embedding_space(settings, store).await?;

    let model = settings.openai.embedding_model.as_str();
    let mut items = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        let vectors = provider.embed(std::slice::from_ref(&chunk.text), model).await?;
        let embedding = vectors
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Internal("embedding response was empty".to_string()))?;
        items.push((StoredChunk::from_chunk(chunk), embedding));
    }

    store.insert_batch(items).await?;

    Ok(IngestReport {
        documents: docs.len(),
        chunks: chunks.len(),
    })
}

/// Keep the collection in a single embedding space: if the store was built
/// with a different model than the one configured, clear it and record the
/// new model before writing.
async fn ensure_embedding_space(
    settings: &Settings,
    store: &dyn RagStore,
) -> Result<(), ApiError> {
    let configured = settings.openai.embedding_model.as_str();
    match store.embedding_model().await? {
        Some(recorded) if recorded == configured => Ok(()),
        Some(recorded) => {
            tracing::warn!(
                "embedding model changed ({} -> {}), clearing collection",
                recorded,
                configured
            );
            store.reset_for_model(configured).await
        }
        None => store.reset_for_model(configured).await,
    }
}
