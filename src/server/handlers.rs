use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::server::ui::CHAT_PAGE;
use crate::state::AppState;
use crate::transcript::DEFAULT_SESSION_ID;

/// Serve the embedded chat page.
pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

/// Liveness plus a summary of the indexed collection.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let chunks = state.store.count().await?;
    let embedding_model = state.store.embedding_model().await?;

    Ok(Json(json!({
        "status": "ok",
        "provider": state.llm.name(),
        "chunks": chunks,
        "embedding_model": embedding_model,
    })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub session: Option<String>,
}

/// Transcript for a session, oldest first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Json<Value> {
    let session_id = params
        .session
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
    let turns = state.transcripts.turns(&session_id);

    Json(json!({
        "session": session_id,
        "turns": turns,
    }))
}
