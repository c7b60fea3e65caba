use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::ApiError;

/// External language-model service: chat completions and embeddings.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Check whether the provider is reachable.
    async fn health_check(&self) -> Result<bool, ApiError>;

    /// Chat completion (non-streaming).
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, ApiError>;

    /// Generate embeddings, one vector per input.
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, ApiError>;
}
