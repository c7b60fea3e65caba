//! Graph-based chat pipeline.
//!
//! A small petgraph runtime executes a linear pipeline of nodes over a shared
//! [`state::AgentState`]. The production graph is assembled by
//! [`builder::build_chat_graph`].

pub mod builder;
pub mod node;
pub mod nodes;
pub mod runtime;
pub mod state;

pub use builder::build_chat_graph;
pub use node::{GraphError, Node, NodeContext, NodeOutput};
pub use runtime::{GraphBuilder, GraphRuntime};
pub use state::AgentState;
