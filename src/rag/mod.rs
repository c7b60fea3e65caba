//! Retrieval-augmented generation plumbing.
//!
//! - `splitter`: overlapping text chunker
//! - `store` / `sqlite`: persistent vector collection
//! - `context`: prompt context formatting with citations
//! - `ingest`: load → chunk → embed → persist pipeline

pub mod context;
pub mod ingest;
mod splitter;
mod sqlite;
pub(crate) mod store;

pub use splitter::{RecursiveSplitter, SplitterConfig, TextChunk};
pub use sqlite::SqliteRagStore;
pub use store::{ChunkSearchResult, RagStore, StoredChunk};
