use axum::{
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::agents::StatisticsAgent;
use crate::models::{AppState, ChatRequest, ChatResponse};
use crate::types::AppResult;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions/{id}/chat", post(post_chat))
        .with_state(state)
}

pub async fn post_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> AppResult<ResponseJson<ChatResponse>> {
    let session = state.sessions.get(id).await?;
    let reply = StatisticsAgent::answer(&state.llm, &session, &request.message).await?;
    let messages = session.read().await.conversation.turns().to_vec();
    Ok(Json(ChatResponse { reply, messages }))
}
