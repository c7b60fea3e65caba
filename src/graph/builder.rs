// Chat graph assembly

use super::node::GraphError;
use super::nodes::{AgentNode, InputNode, OutputNode};
use super::runtime::{GraphBuilder, GraphRuntime};

/// Build the three-node chat pipeline: input -> agent -> output.
pub fn build_chat_graph() -> Result<GraphRuntime, GraphError> {
    GraphBuilder::new()
        .entry("input")
        .max_steps(8)
        .node(Box::new(InputNode::new()))
        .node(Box::new(AgentNode::new()))
        .node(Box::new(OutputNode::new()))
        .edge("input", "agent")
        .edge("agent", "output")
        .build()
}
