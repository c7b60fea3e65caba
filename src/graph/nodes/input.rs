// Input node
// Entry of the pipeline; normalizes the user message

use async_trait::async_trait;

use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::AgentState;

pub struct InputNode;

impl InputNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InputNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for InputNode {
    fn id(&self) -> &'static str {
        "input"
    }

    fn name(&self) -> &'static str {
        "Input Node"
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput, GraphError> {
        state.input = state.input.trim().to_string();
        if state.input.is_empty() {
            return Ok(NodeOutput::Error("empty message".to_string()));
        }

        tracing::debug!("chat turn for session {}", state.session_id);
        Ok(NodeOutput::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::test_context;

    #[tokio::test]
    async fn trims_input_and_continues() {
        let node = InputNode::new();
        let mut state = AgentState::new("s".to_string(), "  hello  ".to_string(), Vec::new());

        let output = node.execute(&mut state, &test_context().await).await.unwrap();
        assert!(matches!(output, NodeOutput::Continue));
        assert_eq!(state.input, "hello");
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let node = InputNode::new();
        let mut state = AgentState::new("s".to_string(), "   ".to_string(), Vec::new());

        let output = node.execute(&mut state, &test_context().await).await.unwrap();
        assert!(matches!(output, NodeOutput::Error(_)));
    }
}
