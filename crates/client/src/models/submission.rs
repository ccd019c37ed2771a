//! Batch submission request and receipts

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::MAX_SUBMIT_BATCH;

/// Upper bound on `SubmitPaperRequest::paper_ids`
const MAX_PAPER_IDS: u64 = MAX_SUBMIT_BATCH as u64;

/// External origin a submitted identifier belongs to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSource {
    #[default]
    Arxiv,
    SemanticScholar,
}

impl PaperSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSource::Arxiv => "arxiv",
            PaperSource::SemanticScholar => "semantic_scholar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaperSource::Arxiv => "arXiv",
            PaperSource::SemanticScholar => "Semantic Scholar",
        }
    }
}

impl fmt::Display for PaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaperSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arxiv" => Ok(PaperSource::Arxiv),
            "semantic_scholar" => Ok(PaperSource::SemanticScholar),
            other => Err(format!("unsupported paper source: {other}")),
        }
    }
}

/// Body of `POST /papers/submit`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmitPaperRequest {
    pub source: PaperSource,

    #[validate(length(min = 1, max = MAX_PAPER_IDS))]
    pub paper_ids: Vec<String>,
}

impl SubmitPaperRequest {
    pub fn new(source: PaperSource, paper_ids: Vec<String>) -> Self {
        Self { source, paper_ids }
    }
}

/// Per-identifier outcome reported by the backend
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmitOutcome {
    Queued,
    Duplicate,
    NotFound,
    Error,
    Other(String),
}

/// How a result row is presented
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Warning,
    Failure,
}

impl SubmitOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            SubmitOutcome::Queued => "queued",
            SubmitOutcome::Duplicate => "duplicate",
            SubmitOutcome::NotFound => "not_found",
            SubmitOutcome::Error => "error",
            SubmitOutcome::Other(raw) => raw,
        }
    }

    /// Only `queued` succeeds and only `duplicate` warns
    pub fn severity(&self) -> Severity {
        match self {
            SubmitOutcome::Queued => Severity::Success,
            SubmitOutcome::Duplicate => Severity::Warning,
            _ => Severity::Failure,
        }
    }
}

impl From<String> for SubmitOutcome {
    fn from(s: String) -> Self {
        match s.as_str() {
            "queued" => SubmitOutcome::Queued,
            "duplicate" => SubmitOutcome::Duplicate,
            "not_found" => SubmitOutcome::NotFound,
            "error" => SubmitOutcome::Error,
            _ => SubmitOutcome::Other(s),
        }
    }
}

impl From<SubmitOutcome> for String {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt for one submitted identifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPaperResult {
    pub source_id: String,
    pub status: SubmitOutcome,
    #[serde(default)]
    pub paper_id: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Body returned by `POST /papers/submit`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPaperResponse {
    pub total: usize,
    pub results: Vec<SubmitPaperResult>,
}
