//! DocuChat: a retrieval-augmented chat service over local docx documents.
//!
//! Ingestion (the `ingest` binary) loads `.docx` files, chunks them, embeds
//! each chunk and persists them in a sqlite vector store. The server (the
//! `docuchat` binary) answers chat messages over WebSocket by retrieving the
//! most similar chunks and prompting an OpenAI-compatible model with them.

pub mod core;
pub mod docx;
pub mod graph;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
pub mod transcript;
