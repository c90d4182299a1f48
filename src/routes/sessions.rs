use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, SessionCreated, TranscriptResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(end_session))
        .route("/api/sessions/{id}/messages", get(transcript))
        .with_state(state)
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, ResponseJson<SessionCreated>) {
    let (session_id, _) = state.sessions.create().await;
    info!(session_id = %session_id, "Session created");
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// Full history, oldest turn first.
async fn transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ResponseJson<TranscriptResponse>> {
    let session = state.sessions.get(id).await?;
    let messages = session.read().await.conversation.turns().to_vec();
    Ok(Json(TranscriptResponse {
        session_id: id,
        messages,
    }))
}

async fn end_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    close_session(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove the session and its files. Taking the write lock waits for any
/// upload that is still being stored; later uploads see `ended` and stop.
pub(crate) async fn close_session(state: &AppState, id: Uuid) -> AppResult<()> {
    let session = state.sessions.remove(id).await?;
    session.write().await.ended = true;
    state.intake.discard_session(id).await?;
    info!(session_id = %id, "Session ended");
    Ok(())
}
