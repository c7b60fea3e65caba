//! WebSocket chat handler.
//!
//! One chat turn per incoming message: the user text is appended to the
//! transcript, the graph runs, and the answer (or an inline error reply)
//! is appended and sent back. A failed turn never loses the user's message.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::graph::AgentState;
use crate::state::AppState;
use crate::transcript::{Role, DEFAULT_SESSION_ID};

#[derive(Debug, Deserialize)]
pub struct WsIncomingMessage {
    #[serde(rename = "type")]
    pub msg_type: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut current_session_id = DEFAULT_SESSION_ID.to_string();

    if let Err(err) = send_history(&mut sender, &state, &current_session_id).await {
        tracing::warn!("failed to send history: {}", err);
        return;
    }

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let incoming: WsIncomingMessage = match serde_json::from_str(&text) {
            Ok(incoming) => incoming,
            Err(_) => continue,
        };

        if let Err(err) =
            handle_message(&mut sender, &state, &mut current_session_id, incoming).await
        {
            let _ = send_json(
                &mut sender,
                json!({"type": "error", "message": err.to_string()}),
            )
            .await;
        }
    }
}

async fn handle_message(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    current_session_id: &mut String,
    data: WsIncomingMessage,
) -> Result<(), ApiError> {
    if data.msg_type.as_deref() == Some("set_session") {
        if let Some(session_id) = data.session_id {
            *current_session_id = session_id;
            send_json(
                sender,
                json!({"type": "session_changed", "sessionId": current_session_id}),
            )
            .await?;
            send_history(sender, state, current_session_id).await?;
        }
        return Ok(());
    }

    let message_text = data.message.unwrap_or_default();
    if message_text.trim().is_empty() {
        return Ok(());
    }

    let session_id = data
        .session_id
        .unwrap_or_else(|| current_session_id.clone());

    // Prior turns only; the current message travels in the state input.
    let chat_history = state.transcripts.chat_history(&session_id);
    state.transcripts.append(&session_id, Role::User, &message_text);

    let mut agent_state = AgentState::new(session_id.clone(), message_text, chat_history);
    let reply = match state.graph.run(&mut agent_state, &state.node_context()).await {
        Ok(()) => agent_state.output.clone().unwrap_or_default(),
        Err(err) => {
            tracing::warn!("chat turn failed: {}", err);
            format!("⚠️ Error: {}", err.message)
        }
    };

    state.transcripts.append(&session_id, Role::Assistant, &reply);

    send_json(
        sender,
        json!({
            "type": "answer",
            "message": reply,
            "sources": agent_state.sources,
        }),
    )
    .await
}

async fn send_history(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    session_id: &str,
) -> Result<(), ApiError> {
    let turns = state.transcripts.turns(session_id);
    send_json(sender, json!({"type": "history", "turns": turns})).await
}

pub async fn send_json(
    sender: &mut SplitSink<WebSocket, Message>,
    payload: Value,
) -> Result<(), ApiError> {
    let text = serde_json::to_string(&payload).map_err(ApiError::internal)?;
    sender
        .send(Message::Text(text))
        .await
        .map_err(ApiError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_message_uses_camel_case_session_id() {
        let incoming: WsIncomingMessage =
            serde_json::from_str(r#"{"type": "chat", "message": "hi", "sessionId": "s1"}"#)
                .unwrap();
        assert_eq!(incoming.msg_type.as_deref(), Some("chat"));
        assert_eq!(incoming.message.as_deref(), Some("hi"));
        assert_eq!(incoming.session_id.as_deref(), Some("s1"));
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let incoming: WsIncomingMessage = serde_json::from_str("{}").unwrap();
        assert!(incoming.msg_type.is_none());
        assert!(incoming.message.is_none());
        assert!(incoming.session_id.is_none());
    }
}
