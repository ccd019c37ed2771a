//! Question/answer session against the chat endpoint
//!
//! A session is either idle or awaiting a response. While awaiting, new
//! questions are dropped. A failed request still yields exactly one assistant
//! message, carrying [`PLACEHOLDER_REPLY`] and no citations.

use tracing::{debug, info, warn};

use crate::api::{ApiResult, PaperApi};
use crate::metrics;
use crate::models::{ChatRequest, ChatResponse, ConversationMessage};

/// Assistant text shown when the chat request fails
pub const PLACEHOLDER_REPLY: &str =
    "Sorry, the chat service is not available yet. Please wait for a later release.";

/// A question that has been logged and is waiting for its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    request: ChatRequest,
}

impl PendingTurn {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConversationSession {
    messages: Vec<ConversationMessage>,
    awaiting: bool,
    scope: Option<Vec<i64>>,
}

impl ConversationSession {
    /// Session searching the whole library
    pub fn new() -> Self {
        Self::default()
    }

    /// Session restricted to the given papers
    pub fn scoped(paper_ids: Vec<i64>) -> Self {
        Self {
            scope: Some(paper_ids),
            ..Default::default()
        }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    pub fn scope(&self) -> Option<&[i64]> {
        self.scope.as_deref()
    }

    /// Log the question and enter the awaiting state.
    ///
    /// Returns `None`, leaving the session untouched, when the trimmed
    /// question is empty or a response is still awaited.
    pub fn begin_submit(&mut self, question: &str) -> Option<PendingTurn> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        if self.awaiting {
            debug!("Response still pending, dropping question");
            return None;
        }

        self.messages.push(ConversationMessage::user(question));
        self.awaiting = true;
        Some(PendingTurn {
            request: ChatRequest {
                question: question.to_string(),
                paper_ids: self.scope.clone(),
            },
        })
    }

    /// Append the assistant's reply for `turn` and return to idle
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        result: ApiResult<ChatResponse>,
    ) -> &ConversationMessage {
        self.awaiting = false;
        let reply = match result {
            Ok(response) => {
                info!(
                    sources = response.source_papers.len(),
                    chunks = response.source_chunks.len(),
                    "Chat answered"
                );
                metrics::record_chat_turn(true);
                ConversationMessage::assistant(response)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    question = %turn.request.question,
                    "Chat request failed, using placeholder"
                );
                metrics::record_chat_turn(false);
                metrics::record_soft_failure("conversation");
                ConversationMessage::assistant_text(PLACEHOLDER_REPLY)
            }
        };
        self.messages.push(reply);
        &self.messages[self.messages.len() - 1]
    }

    /// Ask one question. Returns the assistant reply, or `None` if the
    /// question was dropped.
    pub async fn submit(
        &mut self,
        api: &dyn PaperApi,
        question: &str,
    ) -> Option<&ConversationMessage> {
        let turn = self.begin_submit(question)?;
        let result = api.chat(turn.request()).await;
        Some(self.complete(turn, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiCall, MockPaperApi};
    use crate::errors::TransportError;
    use crate::models::Role;

    fn answer(text: &str) -> ChatResponse {
        ChatResponse {
            answer: text.into(),
            source_papers: vec![3, 7],
            source_chunks: vec!["Self-attention relates positions.".into()],
        }
    }

    #[tokio::test]
    async fn test_answer_carries_citations() {
        let api = MockPaperApi::new();
        api.push_chat(Ok(answer("It replaces recurrence with attention.")));

        let mut session = ConversationSession::new();
        let reply = session.submit(&api, "  What does the Transformer change?  ").await.unwrap();
        assert_eq!(reply.cited_papers(), &[3, 7]);

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ConversationMessage::user("What does the Transformer change?"));
        assert_eq!(messages[1].role, Role::Assistant);
        assert!(!session.is_awaiting());
    }

    #[tokio::test]
    async fn test_blank_question_is_ignored() {
        let api = MockPaperApi::new();
        let mut session = ConversationSession::new();
        assert!(session.submit(&api, " \n\t").await.is_none());
        assert!(session.messages().is_empty());
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_question_while_awaiting_is_dropped() {
        let api = MockPaperApi::new();
        let mut session = ConversationSession::new();

        let turn = session.begin_submit("first").unwrap();
        assert!(session.is_awaiting());
        assert!(session.begin_submit("second").is_none());
        assert_eq!(session.messages().len(), 1);

        let result = tokio_test::block_on(api.chat(turn.request()));
        session.complete(turn, result);
        assert_eq!(api.call_count(), 1);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_any_failure_yields_one_placeholder() {
        let failures = vec![
            TransportError::Status { status: 404, body: "Not Found".into() },
            TransportError::Status { status: 500, body: "boom".into() },
            TransportError::Status { status: 501, body: "not implemented".into() },
            TransportError::Connection { message: "refused".into() },
            TransportError::Decode { message: "missing field `answer`".into() },
        ];
        let api = MockPaperApi::new();
        for failure in &failures {
            api.push_chat(Err(failure.clone()));
        }

        let mut session = ConversationSession::new();
        for (turn, _) in failures.iter().enumerate() {
            let reply = session.submit(&api, "anything?").await.unwrap();
            assert_eq!(reply.content, PLACEHOLDER_REPLY);
            assert!(reply.cited_papers().is_empty());
            assert!(reply.cited_chunks().is_empty());
            assert!(!session.is_awaiting());
            assert_eq!(session.messages().len(), (turn + 1) * 2);
        }
    }

    #[tokio::test]
    async fn test_scoped_session_sends_paper_ids() {
        let api = MockPaperApi::new();
        api.push_chat(Ok(answer("ok"))).push_chat(Ok(answer("ok")));

        let mut scoped = ConversationSession::scoped(vec![11, 12]);
        scoped.submit(&api, "compare them").await;
        let mut open = ConversationSession::new();
        open.submit(&api, "anything new?").await;

        assert_eq!(
            api.calls(),
            vec![
                ApiCall::Chat(ChatRequest {
                    question: "compare them".into(),
                    paper_ids: Some(vec![11, 12]),
                }),
                ApiCall::Chat(ChatRequest {
                    question: "anything new?".into(),
                    paper_ids: None,
                }),
            ]
        );
    }
}
