// Agent node
// Retrieval plus chat completion, with a catch-all error trap

use async_trait::async_trait;

use crate::core::errors::ApiError;
use crate::graph::node::{GraphError, Node, NodeContext, NodeOutput};
use crate::graph::state::AgentState;
use crate::llm::{ChatMessage, ChatRequest};
use crate::rag::context::{format_context, sources};

pub struct AgentNode;

impl AgentNode {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgentNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Node for AgentNode {
    fn id(&self) -> &'static str {
        "agent"
    }

    fn name(&self) -> &'static str {
        "Agent Node"
    }

    async fn execute(
        &self,
        state: &mut AgentState,
        ctx: &NodeContext,
    ) -> Result<NodeOutput, GraphError> {
        // Any failure becomes an inline reply rather than a raised error, so
        // the transcript always advances.
        match answer(state, ctx).await {
            Ok(reply) => {
                state.output = Some(reply);
            }
            Err(err) => {
                tracing::warn!("agent step failed: {}", err);
                state.output = Some(format!("⚠️ Error: {}", err));
            }
        }

        Ok(NodeOutput::Continue)
    }
}

async fn answer(state: &mut AgentState, ctx: &NodeContext) -> Result<String, ApiError> {
    let settings = &ctx.settings;

    let query_embedding = ctx
        .llm
        .embed(
            std::slice::from_ref(&state.input),
            &settings.openai.embedding_model,
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Internal("embedding response was empty".to_string()))?;

    let results = ctx.store.search(&query_embedding, settings.rag.top_k).await?;
    let context = format_context(&results, settings.rag.max_context_chars);
    state.sources = sources(&results);

    let mut messages = vec![ChatMessage::new("system", system_prompt(&context))];
    messages.extend(state.chat_history.iter().cloned());
    messages.push(ChatMessage::new("user", state.input.clone()));
    state.context = Some(context);

    let request =
        ChatRequest::new(messages).with_temperature(settings.openai.temperature);
    ctx.llm.chat(request, &settings.openai.chat_model).await
}

fn system_prompt(context: &str) -> String {
    if context.is_empty() {
        return "You are a helpful assistant answering questions about internal documents. \
                No matching document excerpts were found for this question; say so rather \
                than guessing."
            .to_string();
    }

    format!(
        "You are a helpful assistant answering questions about internal documents. \
         Answer using only the excerpts below; if they do not contain the answer, say so.\n\n\
         Document excerpts:\n{}",
        context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testing::{context_with, StubLlm};
    use crate::rag::{RagStore, StoredChunk};

    fn state(input: &str) -> AgentState {
        AgentState::new("s".to_string(), input.to_string(), Vec::new())
    }

    #[tokio::test]
    async fn answers_from_retrieved_context() {
        let llm = StubLlm::answering("the fee is 2%", vec![1.0, 0.0]);
        let ctx = context_with(llm).await;
        ctx.store
            .insert(
                StoredChunk {
                    chunk_id: "c1".to_string(),
                    content: "The fee is 2% of the transaction.".to_string(),
                    source: "fees.docx".to_string(),
                    metadata: None,
                },
                vec![1.0, 0.0],
            )
            .await
            .unwrap();

        let node = AgentNode::new();
        let mut state = state("what is the fee?");
        let output = node.execute(&mut state, &ctx).await.unwrap();

        assert!(matches!(output, NodeOutput::Continue));
        assert_eq!(state.output.as_deref(), Some("the fee is 2%"));
        assert_eq!(state.sources, vec!["fees.docx"]);
        assert!(state.context.as_deref().unwrap().contains("fees.docx"));
    }

    #[tokio::test]
    async fn failure_becomes_an_inline_error_reply() {
        let ctx = context_with(StubLlm::failing("service unavailable")).await;

        let node = AgentNode::new();
        let mut state = state("anything");
        let output = node.execute(&mut state, &ctx).await.unwrap();

        // The node itself succeeds; the error is the reply.
        assert!(matches!(output, NodeOutput::Continue));
        let reply = state.output.unwrap();
        assert!(reply.starts_with("⚠️ Error:"));
        assert!(reply.contains("service unavailable"));
    }

    #[tokio::test]
    async fn empty_store_still_produces_an_answer() {
        let llm = StubLlm::answering("no documents to cite", vec![1.0, 0.0]);
        let ctx = context_with(llm).await;

        let node = AgentNode::new();
        let mut state = state("anything indexed?");
        node.execute(&mut state, &ctx).await.unwrap();

        assert_eq!(state.output.as_deref(), Some("no documents to cite"));
        assert!(state.sources.is_empty());
        assert_eq!(state.context.as_deref(), Some(""));
    }

    #[test]
    fn system_prompt_embeds_the_context_block() {
        let prompt = system_prompt("[1] (source: a.docx, score: 0.90)\nexcerpt");
        assert!(prompt.contains("a.docx"));
        assert!(system_prompt("").contains("No matching document excerpts"));
    }
}
