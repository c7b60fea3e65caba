// Graph runtime - petgraph based
// Linear pipeline execution engine

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::node::{GraphError, Node, NodeContext, NodeOutput};
use super::state::AgentState;

/// petgraph-backed pipeline runtime.
pub struct GraphRuntime {
    graph: DiGraph<Box<dyn Node>, ()>,
    node_indices: HashMap<String, NodeIndex>,
    entry_node_id: String,
    max_steps: usize,
}

impl std::fmt::Debug for GraphRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphRuntime")
            .field("entry_node_id", &self.entry_node_id)
            .field("max_steps", &self.max_steps)
            .field("node_count", &self.graph.node_count())
            .finish()
    }
}

impl GraphRuntime {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
            entry_node_id: String::new(),
            max_steps: 16,
        }
    }

    pub fn add_node(&mut self, node: Box<dyn Node>) -> NodeIndex {
        let id = node.id().to_string();
        let index = self.graph.add_node(node);
        self.node_indices.insert(id, index);
        index
    }

    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let from_idx = self
            .node_indices
            .get(from)
            .ok_or_else(|| GraphError::new(from, format!("source node not found: {}", from)))?;
        let to_idx = self
            .node_indices
            .get(to)
            .ok_or_else(|| GraphError::new(to, format!("target node not found: {}", to)))?;

        self.graph.add_edge(*from_idx, *to_idx, ());
        Ok(())
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.node_indices.keys().map(|s| s.as_str()).collect()
    }

    /// Execute the graph from the entry node until a node returns `Final`.
    pub async fn run(
        &self,
        state: &mut AgentState,
        ctx: &NodeContext,
    ) -> Result<(), GraphError> {
        if self.entry_node_id.is_empty() {
            return Err(GraphError::new("runtime", "no entry node set"));
        }

        let mut current_idx = *self.node_indices.get(&self.entry_node_id).ok_or_else(|| {
            GraphError::new(
                "runtime",
                format!("entry node not found: {}", self.entry_node_id),
            )
        })?;

        let mut trace: Vec<String> = Vec::new();
        let mut step = 0;

        loop {
            if step >= self.max_steps {
                return Err(GraphError::new(
                    "runtime",
                    format!("maximum steps ({}) exceeded", self.max_steps),
                )
                .with_trace(&trace));
            }

            let node = self
                .graph
                .node_weight(current_idx)
                .ok_or_else(|| GraphError::new("runtime", "node not found in graph"))?;

            let node_id = node.id();
            tracing::debug!("executing node: {} (step {})", node_id, step);

            let output = node
                .execute(state, ctx)
                .await
                .map_err(|e| e.with_trace(&trace))?;
            trace.push(node_id.to_string());

            match output {
                NodeOutput::Final => {
                    tracing::debug!("graph execution complete at node: {}", node_id);
                    return Ok(());
                }
                NodeOutput::Error(msg) => {
                    return Err(GraphError::new(node_id, msg).with_trace(&trace));
                }
                NodeOutput::Continue => {
                    current_idx = self.next_node(current_idx, node_id)?;
                }
            }

            step += 1;
        }
    }

    fn next_node(&self, current_idx: NodeIndex, current_id: &str) -> Result<NodeIndex, GraphError> {
        self.graph
            .neighbors_directed(current_idx, Direction::Outgoing)
            .next()
            .ok_or_else(|| {
                GraphError::new(
                    current_id,
                    format!("no outgoing edge from node: {}", current_id),
                )
            })
    }
}

impl Default for GraphRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing graphs fluently.
pub struct GraphBuilder {
    runtime: GraphRuntime,
    pending_edges: Vec<(String, String)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            runtime: GraphRuntime::new(),
            pending_edges: Vec::new(),
        }
    }

    pub fn entry(mut self, node_id: impl Into<String>) -> Self {
        self.runtime.entry_node_id = node_id.into();
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.runtime.max_steps = max_steps;
        self
    }

    pub fn node(mut self, node: Box<dyn Node>) -> Self {
        self.runtime.add_node(node);
        self
    }

    pub fn edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.pending_edges.push((from.into(), to.into()));
        self
    }

    pub fn build(mut self) -> Result<GraphRuntime, GraphError> {
        for (from, to) in self.pending_edges {
            self.runtime.add_edge(&from, &to)?;
        }

        if !self.runtime.entry_node_id.is_empty()
            && !self
                .runtime
                .node_indices
                .contains_key(&self.runtime.entry_node_id)
        {
            return Err(GraphError::new(
                "builder",
                format!("entry node not found: {}", self.runtime.entry_node_id),
            ));
        }

        Ok(self.runtime)
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
