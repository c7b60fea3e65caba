// Node trait and types
// Base abstraction for graph nodes

use std::sync::Arc;

use async_trait::async_trait;

use super::state::AgentState;
use crate::core::config::Settings;
use crate::llm::LlmProvider;
use crate::rag::RagStore;

/// Collaborators passed to nodes during execution.
pub struct NodeContext {
    pub llm: Arc<dyn LlmProvider>,
    pub store: Arc<dyn RagStore>,
    pub settings: Arc<Settings>,
}

/// Output from a node execution.
#[derive(Debug, Clone)]
pub enum NodeOutput {
    /// Continue along the node's outgoing edge.
    Continue,
    /// Graph execution complete.
    Final,
    /// Error occurred.
    Error(String),
}

/// Graph execution error.
///
/// Includes an `execution_trace` recording the node IDs visited before the
/// error occurred.
#[derive(Debug, Clone)]
pub struct GraphError {
    pub node_id: String,
    pub message: String,
    /// Ordered list of node IDs executed before this error.
    pub execution_trace: Vec<String>,
}

impl GraphError {
    pub fn new(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            message: message.into(),
            execution_trace: Vec::new(),
        }
    }

    pub fn with_trace(mut self, trace: &[String]) -> Self {
        self.execution_trace = trace.to_vec();
        self
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.execution_trace.is_empty() {
            write!(f, "graph error in {}: {}", self.node_id, self.message)
        } else {
            write!(
                f,
                "graph error in {} (trace: {}): {}",
                self.node_id,
                self.execution_trace.join(" -> "),
                self.message
            )
        }
    }
}

impl std::error::Error for GraphError {}

/// Node trait - all graph nodes implement this.
#[async_trait]
pub trait Node: Send + Sync {
    /// Unique identifier for this node.
    fn id(&self) -> &'static str;

    /// Human-readable name for display.
    fn name(&self) -> &'static str {
        self.id()
    }

    /// Execute the node logic.
    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &NodeContext,
    ) -> Result<NodeOutput, GraphError>;
}
