//! Built-in graph nodes for the chat pipeline.

pub mod agent;
pub mod input;
pub mod output;

pub use agent::AgentNode;
pub use input::InputNode;
pub use output::OutputNode;
