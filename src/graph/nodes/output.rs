// Output node
// Terminal node; guarantees a reply is present

use async_trait::async_trait;

use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::AgentState;

pub struct OutputNode;

impl OutputNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutputNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for OutputNode {
    fn id(&self) -> &'static str {
        "output"
    }

    fn name(&self) -> &'static str {
        "Output Node"
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        _ctx: &NodeContext,
    ) -> Result<NodeOutput, GraphError> {
        if state.output.is_none() {
            state.output = Some(String::new());
        }

        tracing::debug!(
            "chat turn complete for session {} ({} sources)",
            state.session_id,
            state.sources.len()
        );
        Ok(NodeOutput::Final)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::test_context;

    #[tokio::test]
    async fn terminates_the_graph() {
        let node = OutputNode::new();
        let mut state = AgentState::new("s".to_string(), "hi".to_string(), Vec::new());
        state.output = Some("reply".to_string());

        let output = node.execute(&mut state, &test_context().await).await.unwrap();
        assert!(matches!(output, NodeOutput::Final));
        assert_eq!(state.output.as_deref(), Some("reply"));
    }

    #[tokio::test]
    async fn missing_reply_is_filled_with_an_empty_string() {
        let node = OutputNode::new();
        let mut state = AgentState::new("s".to_string(), "hi".to_string(), Vec::new());

        node.execute(&mut state, &test_context().await).await.unwrap();
        assert_eq!(state.output.as_deref(), Some(""));
    }
}
