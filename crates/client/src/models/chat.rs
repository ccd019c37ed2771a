//! Chat request/response and conversation messages

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,

    /// Restrict retrieval to these papers; omitted to search everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_ids: Option<Vec<i64>>,
}

/// Body returned by `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub source_papers: Vec<i64>,
    #[serde(default)]
    pub source_chunks: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a conversation log
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<String>>,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            chunks: None,
        }
    }

    pub fn assistant(response: ChatResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: response.answer,
            sources: Some(response.source_papers),
            chunks: Some(response.source_chunks),
        }
    }

    /// Assistant reply with no citations
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: None,
            chunks: None,
        }
    }

    /// Cited paper ids, empty when none were attached
    pub fn cited_papers(&self) -> &[i64] {
        self.sources.as_deref().unwrap_or_default()
    }

    pub fn cited_chunks(&self) -> &[String] {
        self.chunks.as_deref().unwrap_or_default()
    }
}
