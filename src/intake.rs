//! File Intake
//!
//! Persists uploaded bytes under `<root>/<session_id>/<sha256>.<ext>`. Bytes are
//! written to a hidden partial file first and renamed into place, so a reader
//! never observes a half-written upload.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::types::{AppError, AppResult};

/// Extensions the upload surface accepts. Only some of them can be extracted.
pub const ACCEPTED_EXTENSIONS: [&str; 11] = [
    "pdf", "txt", "csv", "doc", "docx", "json", "jpg", "jpeg", "png", "pptx", "xlsx",
];

#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredUpload {
    pub filename: String,
    pub extension: String,
    pub path: PathBuf,
    pub digest: String,
    pub size: u64,
    pub mime_type: String,
}

/// Type tag of an uploaded file: the lower-cased text after the final `.`.
/// A name without a dot yields the whole lower-cased name.
pub fn file_extension(filename: &str) -> String {
    filename.rsplit('.').next().unwrap_or_default().to_lowercase()
}

pub fn is_accepted(extension: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&extension)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Clone)]
pub struct FileIntake {
    root: PathBuf,
}

impl FileIntake {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn session_dir(&self, session_id: Uuid) -> PathBuf {
        self.root.join(session_id.to_string())
    }

    pub async fn store(
        &self,
        session_id: Uuid,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<StoredUpload> {
        let extension = file_extension(filename);
        if !is_accepted(&extension) {
            return Err(AppError::UnsupportedUpload(format!(
                "files of type '{}' are not accepted",
                extension
            )));
        }

        let digest = sha256_hex(bytes);
        let dir = self.session_dir(session_id);
        fs::create_dir_all(&dir).await?;

        let final_path = dir.join(format!("{}.{}", digest, extension));
        let partial_path = dir.join(format!(".{}.partial", Uuid::new_v4()));

        fs::write(&partial_path, bytes).await?;
        if let Err(e) = fs::rename(&partial_path, &final_path).await {
            fs::remove_file(&partial_path).await.ok();
            return Err(e.into());
        }

        let mime_type = mime_guess::from_path(&final_path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        info!(
            session_id = %session_id,
            filename = %filename,
            size = bytes.len(),
            path = %final_path.display(),
            "Upload stored"
        );

        Ok(StoredUpload {
            filename: filename.to_string(),
            extension,
            path: final_path,
            digest,
            size: bytes.len() as u64,
            mime_type,
        })
    }

    /// Delete every file stored for a session.
    pub async fn discard_session(&self, session_id: Uuid) -> AppResult<()> {
        let dir = self.session_dir(session_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(session_id = %session_id, "Session uploads removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Failed to remove session uploads");
                Err(e.into())
            }
        }
    }
}
