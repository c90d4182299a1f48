use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub uploads: UploadConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub openai_api_key: String,
    pub api_base: String,
    pub provider: String,
    pub model: String,
    pub timeout_secs: Option<u64>,
}

// Keeps the API key out of startup logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("openai_api_key", &if self.openai_api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LLMConfig {
    pub fn active_api_key(&self) -> Option<String> {
        let key = self.openai_api_key.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
    pub preview_chars: usize,
    pub lock_wait_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    pub command: String,
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let default_upload_dir = env::temp_dir().join("stat-analyst-uploads");

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "8501")
                    .parse()
                    .context("PORT must be a valid port number")?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            llm: LLMConfig {
                openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
                api_base: var("OPENAI_API_BASE", crate::llm::openai::OPENAI_API_BASE),
                provider: var("LLM_PROVIDER", "openai"),
                model: var("LLM_MODEL", "gpt-3.5-turbo"),
                timeout_secs: lookup("LLM_TIMEOUT_SECS")
                    .map(|v| v.parse())
                    .transpose()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            },
            uploads: UploadConfig {
                dir: lookup("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(default_upload_dir),
                max_bytes: var("MAX_UPLOAD_BYTES", "209715200")
                    .parse()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                preview_chars: var("PREVIEW_CHARS", "1000")
                    .parse()
                    .context("PREVIEW_CHARS must be a character count")?,
                lock_wait_ms: var("LOCK_WAIT_MS", "1000")
                    .parse()
                    .context("LOCK_WAIT_MS must be a whole number of milliseconds")?,
            },
            ocr: OcrConfig {
                command: var("TESSERACT_CMD", "tesseract"),
                language: var("OCR_LANG", "eng"),
            },
        })
    }
}
