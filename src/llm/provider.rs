use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: Option<String>,
    pub api_base: String,
    pub timeout_secs: Option<u64>,
}

impl From<&LLMConfig> for LLMProviderConfig {
    fn from(config: &LLMConfig) -> Self {
        Self {
            name: config.provider.clone(),
            api_key: config.active_api_key(),
            api_base: config.api_base.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Completion client: one adapter plus the fixed model every request uses.
pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
    model: String,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig, model: impl Into<String>) -> AppResult<Self> {
        let adapter: Box<dyn LLMAdapter> = match provider.name.as_str() {
            "openai" => Box::new(crate::llm::openai::OpenAIAdapter::with_options(
                provider.api_key.as_deref(),
                &provider.api_base,
                provider.timeout_secs,
            )?),
            other => {
                return Err(AppError::Config(format!("Unsupported provider: {}", other)));
            }
        };

        Ok(Self {
            adapter,
            provider_name: provider.name,
            model: model.into(),
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(LLMProviderConfig::from(config), config.model.clone())
    }

    /// Wrap an arbitrary adapter, e.g. a local stub.
    pub fn with_adapter(
        adapter: Box<dyn LLMAdapter>,
        provider_name: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            provider_name: provider_name.into(),
            model: model.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Send `messages` with the fixed model and return the first choice's text.
    pub async fn complete(&self, messages: Vec<LLMMessage>) -> AppResult<String> {
        let request = LLMRequest {
            model: self.model.clone(),
            messages,
            max_tokens: None,
            temperature: None,
        };
        debug!(
            provider = %self.provider_name,
            model = %self.model,
            message_count = request.messages.len(),
            "Sending chat completion"
        );

        let response = self.create_chat_completion(&request).await?;
        info!(
            response_len = response.content.len(),
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Chat completion received"
        );
        Ok(response.content)
    }
}
