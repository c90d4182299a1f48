//! Statistics Agent
//!
//! Freeform questions with no file attached. The user's turn is recorded
//! before the completion call and stays in the transcript if the call fails.

use tracing::{info, warn};

use crate::agents::STATISTICS_PERSONA;
use crate::llm::provider::LLM;
use crate::session::{SharedSession, Turn};
use crate::types::{AppError, AppResult, LLMMessage};

pub struct StatisticsAgent;

impl StatisticsAgent {
    pub fn build_prompt(message: &str) -> Vec<LLMMessage> {
        vec![
            LLMMessage::system(STATISTICS_PERSONA),
            LLMMessage::user(message),
        ]
    }

    pub async fn answer(llm: &LLM, session: &SharedSession, message: &str) -> AppResult<String> {
        if message.trim().is_empty() {
            return Err(AppError::InvalidRequest("message must not be empty".to_string()));
        }

        let session_id = {
            let mut guard = session.write().await;
            guard.conversation.push(Turn::user(message));
            guard.id
        };
        info!(session_id = %session_id, message_len = message.len(), "Answering statistics question");

        let reply = llm.complete(Self::build_prompt(message)).await.map_err(|e| {
            warn!(session_id = %session_id, error = %e, "Statistics question failed");
            e
        })?;

        session
            .write()
            .await
            .conversation
            .push(Turn::assistant(reply.clone()));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::stub::{EchoAdapter, FailingAdapter};
    use crate::session::Session;
    use crate::types::Role;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn new_session() -> SharedSession {
        Arc::new(RwLock::new(Session::new()))
    }

    #[tokio::test]
    async fn records_user_then_assistant_turn() {
        let adapter = EchoAdapter::default();
        let llm = adapter.clone().into_llm();
        let session = new_session();

        let reply = StatisticsAgent::answer(&llm, &session, "What is a p-value?")
            .await
            .unwrap();
        assert_eq!(reply, "echo: What is a p-value?");

        let guard = session.read().await;
        let turns = guard.conversation.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!((turns[0].role, turns[0].content.as_str()), (Role::User, "What is a p-value?"));
        assert_eq!(turns[1].role, Role::Assistant);

        let sent = &adapter.recorded()[0];
        assert_eq!(sent.messages, StatisticsAgent::build_prompt("What is a p-value?"));
    }

    #[tokio::test]
    async fn failed_call_keeps_only_the_user_turn() {
        let llm = FailingAdapter.into_llm();
        let session = new_session();

        let err = StatisticsAgent::answer(&llm, &session, "Explain ANOVA").await.unwrap_err();
        assert!(matches!(err, AppError::LLMApi(_)));

        let guard = session.read().await;
        assert_eq!(guard.conversation.len(), 1);
        assert_eq!(guard.conversation.turns()[0].role, Role::User);
    }

    #[tokio::test]
    async fn blank_message_is_rejected_without_a_turn() {
        let llm = EchoAdapter::default().into_llm();
        let session = new_session();
        assert!(StatisticsAgent::answer(&llm, &session, "   ").await.is_err());
        assert!(session.read().await.conversation.is_empty());
    }
}
