//! RagStore trait — abstract interface for the vector store collection.
//!
//! The production implementation is `SqliteRagStore` in the `sqlite` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::splitter::TextChunk;
use crate::core::errors::ApiError;

/// A stored chunk with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Unique chunk identifier.
    pub chunk_id: String,
    /// The text content of the chunk.
    pub content: String,
    /// Source identifier (file name).
    pub source: String,
    /// Optional metadata (JSON).
    pub metadata: Option<serde_json::Value>,
}

impl StoredChunk {
    /// Build a stored chunk from a splitter chunk, assigning a fresh id and
    /// carrying the offsets along as metadata.
    pub fn from_chunk(chunk: &TextChunk) -> Self {
        Self {
            chunk_id: Uuid::new_v4().to_string(),
            content: chunk.text.clone(),
            source: chunk.source.clone(),
            metadata: Some(json!({
                "start_offset": chunk.start_offset,
                "chunk_index": chunk.chunk_index,
            })),
        }
    }
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSearchResult {
    pub chunk: StoredChunk,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

/// Abstract interface for the persistent vector collection.
///
/// Every stored chunk carries exactly one embedding, and the collection
/// records which embedding model produced its vectors so queries can be
/// checked for embedding-space consistency.
#[async_trait]
pub trait RagStore: Send + Sync {
    /// Insert a chunk with its embedding vector.
    async fn insert(&self, chunk: StoredChunk, embedding: Vec<f32>) -> Result<(), ApiError>;

    /// Insert multiple chunks in a single transaction.
    async fn insert_batch(&self, items: Vec<(StoredChunk, Vec<f32>)>) -> Result<(), ApiError>;

    /// Search for the chunks most similar to the query embedding.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, ApiError>;

    /// Total number of stored chunks.
    async fn count(&self) -> Result<usize, ApiError>;

    /// The embedding model the collection was built with, if recorded.
    async fn embedding_model(&self) -> Result<Option<String>, ApiError>;

    /// Clear all chunks and record `embedding_model` as the collection's
    /// embedding space. Used when the configured model changes.
    async fn reset_for_model(&self, embedding_model: &str) -> Result<(), ApiError>;
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_chunk_keeps_offsets_in_metadata() {
        let chunk = TextChunk {
            text: "hello".to_string(),
            source: "a.docx".to_string(),
            start_offset: 600,
            chunk_index: 1,
        };

        let stored = StoredChunk::from_chunk(&chunk);
        assert_eq!(stored.content, "hello");
        assert_eq!(stored.source, "a.docx");
        let metadata = stored.metadata.unwrap();
        assert_eq!(metadata["start_offset"], 600);
        assert_eq!(metadata["chunk_index"], 1);
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) > 0.99);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
