//! Error types for the Daily Papers client
//!
//! Provides:
//! - `TransportError` for failed HTTP exchanges (status + body)
//! - `ValidationError` for local pre-flight checks
//! - `PollError` for the task polling policy
//! - `ClientError` umbrella with machine-readable codes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    EmptyBatch,
    BatchTooLarge,

    // Transport errors (8xxx)
    HttpStatus,
    NotFound,
    ConnectionError,
    DecodeError,

    // Task polling errors (85xx)
    PollExhausted,
    PollQueryFailed,

    // Internal errors (9xxx)
    ConfigurationError,
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::EmptyBatch => 1001,
            ErrorCode::BatchTooLarge => 1002,

            ErrorCode::HttpStatus => 8001,
            ErrorCode::NotFound => 8002,
            ErrorCode::ConnectionError => 8003,
            ErrorCode::DecodeError => 8004,

            ErrorCode::PollExhausted => 8501,
            ErrorCode::PollQueryFailed => 8502,

            ErrorCode::ConfigurationError => 9001,
            ErrorCode::InternalError => 9002,
        }
    }
}

/// A failed exchange with the platform API.
///
/// `Status` is the contract failure: any non-2xx response, carrying the
/// numeric status and the raw body text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{status}: {body}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl TransportError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Status { .. } => "status",
            TransportError::Connection { .. } => "connection",
            TransportError::Decode { .. } => "decode",
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Connection {
                message: err.to_string(),
            }
        }
    }
}

/// Pre-flight rejection of a submission batch. Never reaches the network.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter at least one paper ID")]
    EmptyInput,

    #[error("At most {limit} papers can be submitted at once (got {count})")]
    BatchTooLarge { count: usize, limit: usize },
}

/// Polling stopped before the task reached a terminal state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("Task {task_id} still {last_status} after {attempts} status checks")]
    Exhausted {
        task_id: String,
        attempts: u32,
        last_status: String,
    },

    #[error("Task {task_id} status query failed after {attempts} attempts: {source}")]
    Query {
        task_id: String,
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ClientError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Transport(TransportError::Status { status: 404, .. }) => {
                ErrorCode::NotFound
            }
            ClientError::Transport(TransportError::Status { .. }) => ErrorCode::HttpStatus,
            ClientError::Transport(TransportError::Connection { .. }) => ErrorCode::ConnectionError,
            ClientError::Transport(TransportError::Decode { .. }) => ErrorCode::DecodeError,
            ClientError::Validation(ValidationError::EmptyInput) => ErrorCode::EmptyBatch,
            ClientError::Validation(ValidationError::BatchTooLarge { .. }) => {
                ErrorCode::BatchTooLarge
            }
            ClientError::Poll(PollError::Exhausted { .. }) => ErrorCode::PollExhausted,
            ClientError::Poll(PollError::Query { .. }) => ErrorCode::PollQueryFailed,
            ClientError::Configuration { .. } => ErrorCode::ConfigurationError,
            ClientError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Local failures that never touched the network
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Configuration { .. }
        )
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_matches_inline_message() {
        let err = TransportError::Status {
            status: 422,
            body: "{\"detail\":\"bad source\"}".into(),
        };
        assert_eq!(err.to_string(), "422: {\"detail\":\"bad source\"}");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_error_code_mapping() {
        let err: ClientError = TransportError::Status {
            status: 404,
            body: "missing".into(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.code().as_code(), 8002);

        let err: ClientError = ValidationError::BatchTooLarge { count: 51, limit: 50 }.into();
        assert_eq!(err.code(), ErrorCode::BatchTooLarge);
        assert!(err.is_local());
    }

    #[test]
    fn test_connection_error_has_no_status() {
        let err = TransportError::Connection {
            message: "refused".into(),
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
        assert_eq!(err.kind(), "connection");
    }
}
