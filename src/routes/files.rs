use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json as ResponseJson,
    routing::post,
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::FileQueryAgent;
use crate::models::{AppState, ChatResponse, FileQueryRequest, Notice, UploadParams, UploadResponse};
use crate::intake::StoredUpload;
use crate::session::{ActiveFile, SharedSession};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions/{id}/files", post(upload_file))
        .route("/api/sessions/{id}/files/query", post(query_file))
        .with_state(state)
}

/// Store the upload, wait out other holders, extract its text and make it the
/// session's active file.
async fn upload_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<ResponseJson<UploadResponse>> {
    let session = state.sessions.get(id).await?;

    let mut received = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::InvalidRequest("uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(format!("failed to read upload: {}", e)))?;
        received = Some((filename, bytes));
        break;
    }

    let (filename, bytes) = received
        .ok_or_else(|| AppError::InvalidRequest("missing multipart field 'file'".to_string()))?;
    info!(session_id = %id, filename = %filename, size = bytes.len(), "Upload received");

    let upload = store_upload(&state, &session, &filename, &bytes).await?;

    let mut notices: Vec<Notice> = state
        .lock_guard
        .wait_for_release(&upload.path)
        .await
        .into_iter()
        .map(Notice::info)
        .collect();

    let extraction = state.extractor.extract(&upload, params.refresh).await;
    if let Some(message) = extraction.notice {
        warn!(session_id = %id, filename = %filename, notice = %message, "Upload has no usable text");
        notices.push(Notice::error(message));
    }

    let preview: String = extraction
        .text
        .chars()
        .take(state.config.uploads.preview_chars)
        .collect();

    let response = UploadResponse {
        filename: upload.filename.clone(),
        extension: upload.extension.clone(),
        size: upload.size,
        mime_type: upload.mime_type.clone(),
        digest: upload.digest.clone(),
        preview,
        cached: extraction.cached,
        notices,
    };

    session.write().await.active_file = Some(ActiveFile {
        upload,
        text: extraction.text,
    });

    Ok(Json(response))
}

/// Persist an upload for a live session. The read lock is held while the
/// bytes are written so ending the session cannot interleave with the store.
async fn store_upload(
    state: &AppState,
    session: &SharedSession,
    filename: &str,
    bytes: &[u8],
) -> AppResult<StoredUpload> {
    let guard = session.read().await;
    if guard.ended {
        return Err(AppError::NotFound(format!("session {}", guard.id)));
    }
    state.intake.store(guard.id, filename, bytes).await
}

async fn query_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FileQueryRequest>,
) -> AppResult<ResponseJson<ChatResponse>> {
    let session = state.sessions.get(id).await?;
    let reply = FileQueryAgent::answer(&state.llm, &session, &request.query).await?;
    let messages = session.read().await.conversation.turns().to_vec();
    Ok(Json(ChatResponse { reply, messages }))
}
