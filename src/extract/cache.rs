use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Cache key: content digest plus the type tag the bytes were decoded as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub digest: String,
    pub tag: String,
}

impl CacheKey {
    pub fn new(digest: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            tag: tag.into(),
        }
    }
}

/// Extracted text keyed by content, shared by every session. Only successful
/// extractions are stored.
#[derive(Clone, Default)]
pub struct ExtractionCache {
    entries: Arc<RwLock<HashMap<CacheKey, String>>>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: CacheKey, text: String) {
        self.entries.write().await.insert(key, text);
    }

    pub async fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
