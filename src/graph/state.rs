// Graph state
// Conversation state threaded through the pipeline

use crate::llm::ChatMessage;

/// State carried through one chat turn: the user input and prior transcript
/// going in, the retrieved context and final answer coming out.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub session_id: String,
    pub input: String,
    pub chat_history: Vec<ChatMessage>,

    /// Context block built from retrieved chunks.
    pub context: Option<String>,
    /// Distinct sources cited in the context.
    pub sources: Vec<String>,

    /// Final answer.
    pub output: Option<String>,
}

impl AgentState {
    pub fn new(session_id: String, input: String, chat_history: Vec<ChatMessage>) -> Self {
        Self {
            session_id,
            input,
            chat_history,
            context: None,
            sources: Vec::new(),
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_no_output() {
        let state = AgentState::new("s1".to_string(), "question".to_string(), Vec::new());
        assert_eq!(state.session_id, "s1");
        assert_eq!(state.input, "question");
        assert!(state.chat_history.is_empty());
        assert!(state.context.is_none());
        assert!(state.sources.is_empty());
        assert!(state.output.is_none());
    }
}
