//! Text Extractor
//!
//! Turns an uploaded file into one plain-text blob. Decoding is chosen by the
//! file's type tag; results are memoized by content digest.

pub mod cache;
pub mod csv_table;
pub mod docx;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;

use tracing::{debug, error, warn};

use crate::config::OcrConfig;
use crate::intake::StoredUpload;

pub use cache::{CacheKey, ExtractionCache};
pub use error::ExtractError;

pub const UNSUPPORTED_NOTICE: &str = "Unsupported file type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Csv,
    Text,
    Image,
}

impl FileKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Text),
            "jpg" | "jpeg" | "png" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Read `path` and decode it according to `tag`.
pub fn extract_text(path: &Path, tag: &str, ocr_config: &OcrConfig) -> Result<String, ExtractError> {
    let kind =
        FileKind::from_tag(tag).ok_or_else(|| ExtractError::UnsupportedFileType(tag.to_string()))?;
    let bytes = std::fs::read(path)?;
    decode(bytes, kind, ocr_config)
}

pub fn decode(bytes: Vec<u8>, kind: FileKind, ocr_config: &OcrConfig) -> Result<String, ExtractError> {
    match kind {
        FileKind::Pdf => pdf::extract(&bytes),
        FileKind::Docx => docx::extract(&bytes),
        FileKind::Csv => csv_table::extract(&bytes),
        FileKind::Text => text::extract(bytes),
        FileKind::Image => ocr::recognize(&bytes, ocr_config),
    }
}

/// Best-effort outcome: failures leave `text` empty and set `notice`.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub text: String,
    pub notice: Option<String>,
    pub cached: bool,
}

impl Extraction {
    fn failed(notice: String) -> Self {
        Self {
            text: String::new(),
            notice: Some(notice),
            cached: false,
        }
    }
}

#[derive(Clone)]
pub struct DocumentExtractor {
    cache: ExtractionCache,
    ocr: OcrConfig,
}

impl DocumentExtractor {
    pub fn new(ocr: OcrConfig) -> Self {
        Self {
            cache: ExtractionCache::new(),
            ocr,
        }
    }

    pub fn cache(&self) -> &ExtractionCache {
        &self.cache
    }

    /// Extract an upload's text. Never fails: decoder errors become a notice.
    /// With `refresh`, any cached text for the same bytes is dropped first.
    pub async fn extract(&self, upload: &StoredUpload, refresh: bool) -> Extraction {
        let tag = upload.extension.as_str();
        if FileKind::from_tag(tag).is_none() {
            warn!(filename = %upload.filename, tag = %tag, "No extractor for file type");
            return Extraction::failed(UNSUPPORTED_NOTICE.to_string());
        }

        let key = CacheKey::new(&upload.digest, tag);
        if refresh && self.cache.invalidate(&key).await {
            debug!(digest = %upload.digest, "Cached extraction invalidated");
        }
        if let Some(text) = self.cache.get(&key).await {
            debug!(digest = %upload.digest, tag = %tag, "Extraction cache hit");
            return Extraction {
                text,
                notice: None,
                cached: true,
            };
        }

        let path = upload.path.clone();
        let owned_tag = tag.to_string();
        let ocr = self.ocr.clone();
        let outcome =
            tokio::task::spawn_blocking(move || extract_text(&path, &owned_tag, &ocr)).await;

        match outcome {
            Ok(Ok(text)) => {
                debug!(
                    filename = %upload.filename,
                    chars = text.chars().count(),
                    "Text extracted"
                );
                self.cache.insert(key, text.clone()).await;
                Extraction {
                    text,
                    notice: None,
                    cached: false,
                }
            }
            Ok(Err(e)) => {
                error!(filename = %upload.filename, error = %e, "Text extraction failed");
                Extraction::failed(format!("Error extracting text from file: {}", e))
            }
            Err(e) => {
                error!(filename = %upload.filename, error = %e, "Extraction task failed");
                Extraction::failed(format!("Error extracting text from file: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn upload_at(path: PathBuf, extension: &str, bytes: &[u8]) -> StoredUpload {
        StoredUpload {
            filename: format!("fixture.{}", extension),
            extension: extension.to_string(),
            path,
            digest: crate::intake::sha256_hex(bytes),
            size: bytes.len() as u64,
            mime_type: "application/octet-stream".to_string(),
        }
    }

    fn write_upload(dir: &Path, name: &str, extension: &str, bytes: &[u8]) -> StoredUpload {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        upload_at(path, extension, bytes)
    }

    #[test]
    fn tags_map_to_decoders() {
        assert_eq!(FileKind::from_tag("jpeg"), Some(FileKind::Image));
        assert_eq!(FileKind::from_tag("txt"), Some(FileKind::Text));
        assert_eq!(FileKind::from_tag("xlsx"), None);
    }

    #[test]
    fn extract_text_dispatches_on_tag() {
        let tmp = tempfile::tempdir().unwrap();
        let pdf_path = tmp.path().join("hello.pdf");
        std::fs::write(&pdf_path, fixtures::pdf_with_pages(&["Hello World"])).unwrap();
        let docx_path = tmp.path().join("notes.docx");
        std::fs::write(&docx_path, fixtures::docx_with_paragraphs(&["H0: mu = 0", "H1: mu != 0"]))
            .unwrap();

        let ocr = OcrConfig::default();
        assert_eq!(extract_text(&pdf_path, "pdf", &ocr).unwrap(), "Hello World");
        assert_eq!(
            extract_text(&docx_path, "docx", &ocr).unwrap(),
            "H0: mu = 0\nH1: mu != 0"
        );
        assert!(matches!(
            extract_text(&pdf_path, "xyz", &ocr),
            Err(ExtractError::UnsupportedFileType(_))
        ));
    }

    #[tokio::test]
    async fn unsupported_tag_reports_and_returns_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = write_upload(tmp.path(), "data.xyz", "xyz", b"opaque");
        let extractor = DocumentExtractor::new(OcrConfig::default());

        let result = extractor.extract(&upload, false).await;
        assert!(result.text.is_empty());
        assert_eq!(result.notice.as_deref(), Some("Unsupported file type"));
    }

    #[tokio::test]
    async fn corrupt_pdf_reports_error_not_crash() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = write_upload(tmp.path(), "broken.pdf", "pdf", b"%PDF-1.4 garbage");
        let extractor = DocumentExtractor::new(OcrConfig::default());

        let result = extractor.extract(&upload, false).await;
        assert!(result.text.is_empty());
        assert!(result
            .notice
            .unwrap()
            .starts_with("Error extracting text from file: "));
        assert!(extractor.cache().is_empty().await);
    }

    #[tokio::test]
    async fn identical_bytes_hit_cache_under_another_path() {
        let tmp = tempfile::tempdir().unwrap();
        let bytes = b"a,b\n1,2\n";
        let first = write_upload(tmp.path(), "one.csv", "csv", bytes);
        let extractor = DocumentExtractor::new(OcrConfig::default());

        let fresh = extractor.extract(&first, false).await;
        assert!(!fresh.cached);
        assert!(fresh.text.contains('a') && fresh.text.contains('2'));

        // Never written to disk: only the cache can answer.
        let second = upload_at(tmp.path().join("two.csv"), "csv", bytes);
        let hit = extractor.extract(&second, false).await;
        assert!(hit.cached);
        assert_eq!(hit.text, fresh.text);
    }

    #[tokio::test]
    async fn refresh_forces_reextraction() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = write_upload(tmp.path(), "notes.txt", "txt", b"variance");
        let extractor = DocumentExtractor::new(OcrConfig::default());

        assert!(!extractor.extract(&upload, false).await.cached);
        assert!(extractor.extract(&upload, false).await.cached);

        let refreshed = extractor.extract(&upload, true).await;
        assert!(!refreshed.cached);
        assert_eq!(refreshed.text, "variance");
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let bytes = [0xff, 0xfe, 0x00];
        let upload = write_upload(tmp.path(), "bad.txt", "txt", &bytes);
        let extractor = DocumentExtractor::new(OcrConfig::default());

        assert!(extractor.extract(&upload, false).await.notice.is_some());
        let again = extractor.extract(&upload, false).await;
        assert!(!again.cached);
        assert!(again.notice.is_some());
    }
}
