//! File Query Agent
//!
//! Sends the active file's extracted text together with the user's question.
//! Only the model's reply is recorded in the transcript.

use tracing::{info, warn};

use crate::agents::ASSISTANT_PERSONA;
use crate::llm::provider::LLM;
use crate::session::{SharedSession, Turn};
use crate::types::{AppError, AppResult, LLMMessage};

pub struct FileQueryAgent;

impl FileQueryAgent {
    pub fn build_prompt(file_text: &str, query: &str) -> Vec<LLMMessage> {
        vec![
            LLMMessage::system(ASSISTANT_PERSONA),
            LLMMessage::user(format!(
                "Here is the content from the uploaded file: {}\n\nUser Query: {}",
                file_text, query
            )),
        ]
    }

    pub async fn answer(llm: &LLM, session: &SharedSession, query: &str) -> AppResult<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidRequest("query must not be empty".to_string()));
        }

        let (session_id, filename, file_text) = {
            let guard = session.read().await;
            let active = guard.active_file.as_ref().ok_or_else(|| {
                AppError::InvalidRequest("upload a file before asking about it".to_string())
            })?;
            (guard.id, active.upload.filename.clone(), active.text.clone())
        };

        info!(
            session_id = %session_id,
            filename = %filename,
            file_chars = file_text.chars().count(),
            "Answering file query"
        );

        let reply = match llm.complete(Self::build_prompt(&file_text, query)).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "File query failed");
                return Err(e);
            }
        };

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
    use crate::intake::StoredUpload;
    use crate::llm::stub::{EchoAdapter, FailingAdapter};
    use crate::session::{ActiveFile, Session};
    use crate::types::Role;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn session_with_file(text: &str) -> SharedSession {
        let mut session = Session::new();
        session.active_file = Some(ActiveFile {
            upload: StoredUpload {
                filename: "scores.csv".to_string(),
                extension: "csv".to_string(),
                path: "/tmp/scores.csv".into(),
                digest: "00".to_string(),
                size: 0,
                mime_type: "text/csv".to_string(),
            },
            text: text.to_string(),
        });
        Arc::new(RwLock::new(session))
    }

    #[test]
    fn prompt_wraps_file_text_and_query() {
        let messages = FileQueryAgent::build_prompt("a  b\n1  2", "What is the mean of b?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], LLMMessage::system("You are a helpful assistant."));
        assert_eq!(
            messages[1].content,
            "Here is the content from the uploaded file: a  b\n1  2\n\nUser Query: What is the mean of b?"
        );
    }

    #[tokio::test]
    async fn appends_only_the_assistant_reply() {
        let adapter = EchoAdapter::default();
        let llm = adapter.clone().into_llm();
        let session = session_with_file("group,score");

        let reply = FileQueryAgent::answer(&llm, &session, "Summarize").await.unwrap();

        let guard = session.read().await;
        let turns = guard.conversation.turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::Assistant);
        assert_eq!(turns[0].content, reply);

        let sent = &adapter.recorded()[0];
        assert_eq!(sent.model, "gpt-3.5-turbo");
        assert_eq!(sent.messages[0].content, ASSISTANT_PERSONA);
        assert!(sent.messages[1].content.contains("group,score"));
        assert!(sent
            .messages
            .iter()
            .all(|m| m.content != crate::agents::STATISTICS_PERSONA));
    }

    #[tokio::test]
    async fn requires_an_uploaded_file() {
        let llm = EchoAdapter::default().into_llm();
        let session: SharedSession = Arc::new(RwLock::new(Session::new()));
        let err = FileQueryAgent::answer(&llm, &session, "Summarize").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn failure_leaves_transcript_untouched() {
        let llm = FailingAdapter.into_llm();
        let session = session_with_file("x");
        let err = FileQueryAgent::answer(&llm, &session, "Summarize").await.unwrap_err();
        assert!(matches!(err, AppError::LLMApi(_)));
        assert!(session.read().await.conversation.is_empty());
    }
}
