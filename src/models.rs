use std::sync::Arc;

use crate::config::Config;
use crate::extract::DocumentExtractor;
use crate::intake::FileIntake;
use crate::llm::provider::LLM;
use crate::lock_guard::LockGuard;
use crate::session::{SessionStore, Turn};
use crate::types::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<LLM>,
    pub sessions: SessionStore,
    pub intake: FileIntake,
    pub extractor: DocumentExtractor,
    pub lock_guard: LockGuard,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let llm = LLM::from_config(&config.llm)?;
        Ok(Self::with_llm(config, llm))
    }

    pub fn with_llm(config: Config, llm: LLM) -> Self {
        Self {
            intake: FileIntake::new(config.uploads.dir.clone()),
            extractor: DocumentExtractor::new(config.ocr.clone()),
            lock_guard: LockGuard::from_millis(config.uploads.lock_wait_ms),
            sessions: SessionStore::new(),
            llm: Arc::new(llm),
            config,
        }
    }
}

// API payloads

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Inline report shown next to an upload.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionCreated {
    pub session_id: uuid::Uuid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TranscriptResponse {
    pub session_id: uuid::Uuid,
    pub messages: Vec<Turn>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub extension: String,
    pub size: u64,
    pub mime_type: String,
    pub digest: String,
    pub preview: String,
    pub cached: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UploadParams {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FileQueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub messages: Vec<Turn>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub sessions: usize,
}
