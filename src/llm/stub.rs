// In-process adapters for tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm::provider::{LLMAdapter, LLM};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, Role, TokenUsage};

/// Replies with the last user message, prefixed with "echo: ".
/// Every request is recorded for inspection.
#[derive(Clone, Default)]
pub struct EchoAdapter {
    pub requests: Arc<Mutex<Vec<LLMRequest>>>,
}

impl EchoAdapter {
    pub fn recorded(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn into_llm(self) -> LLM {
        LLM::with_adapter(Box::new(self), "stub", "gpt-3.5-turbo")
    }
}

#[async_trait]
impl LLMAdapter for EchoAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let last_user = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(LLMResponse {
            content: format!("echo: {}", last_user),
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}

pub struct FailingAdapter;

impl FailingAdapter {
    pub fn into_llm(self) -> LLM {
        LLM::with_adapter(Box::new(self), "stub", "gpt-3.5-turbo")
    }
}

#[async_trait]
impl LLMAdapter for FailingAdapter {
    async fn create_chat_completion(&self, _request: &LLMRequest) -> AppResult<LLMResponse> {
        Err(AppError::LLMApi("upstream unavailable".to_string()))
    }
}
