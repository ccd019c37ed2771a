//! Crawl task handles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Task state as reported by the backend's worker queue
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Pending,
    Started,
    Retry,
    Success,
    Failure,
    Revoked,
    /// Backend could not resolve the task id
    Unknown,
    /// Backend has no task runner wired up
    NotImplemented,
    Other(String),
}

impl TaskState {
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Started => "started",
            TaskState::Retry => "retry",
            TaskState::Success => "success",
            TaskState::Failure => "failure",
            TaskState::Revoked => "revoked",
            TaskState::Unknown => "unknown",
            TaskState::NotImplemented => "not_implemented",
            TaskState::Other(raw) => raw,
        }
    }

    /// No further progress will be reported
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Success | TaskState::Failure | TaskState::Revoked | TaskState::NotImplemented
        )
    }
}

impl From<String> for TaskState {
    fn from(s: String) -> Self {
        // Celery reports upper-case state names
        match s.to_ascii_lowercase().as_str() {
            "pending" => TaskState::Pending,
            "started" => TaskState::Started,
            "retry" => TaskState::Retry,
            "success" => TaskState::Success,
            "failure" => TaskState::Failure,
            "revoked" => TaskState::Revoked,
            "unknown" => TaskState::Unknown,
            "not_implemented" => TaskState::NotImplemented,
            _ => TaskState::Other(s),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned by `POST /tasks/crawl`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlAccepted {
    pub status: TaskState,

    /// Absent while the backend has no task runner
    #[serde(default)]
    pub task_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body returned by `GET /tasks/{task_id}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: String,
    pub status: TaskState,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskStatus {
    /// Terminal by state, or because the backend attached an error
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal() || self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskState::Success && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celery_state_names_decode() {
        let status: TaskStatus = serde_json::from_value(serde_json::json!({
            "task_id": "c0ffee",
            "status": "SUCCESS",
            "result": "42 papers crawled"
        }))
        .unwrap();
        assert_eq!(status.status, TaskState::Success);
        assert!(status.is_terminal());
        assert!(status.is_success());
    }

    #[test]
    fn test_error_field_makes_status_terminal() {
        let status = TaskStatus {
            task_id: "t1".into(),
            status: TaskState::Other("PROGRESS".into()),
            result: None,
            error: Some("arXiv API timed out".into()),
        };
        assert!(status.is_terminal());
        assert!(!status.is_success());
    }

    #[test]
    fn test_placeholder_crawl_response_has_no_task_id() {
        let accepted: CrawlAccepted = serde_json::from_value(serde_json::json!({
            "status": "not_implemented",
            "message": "Crawl tasks will be available in Phase 2"
        }))
        .unwrap();
        assert_eq!(accepted.status, TaskState::NotImplemented);
        assert_eq!(accepted.task_id, None);
    }

    #[test]
    fn test_unknown_state_keeps_polling() {
        assert!(!TaskState::from("unknown".to_string()).is_terminal());
        assert!(!TaskState::from("PENDING".to_string()).is_terminal());
    }
}
