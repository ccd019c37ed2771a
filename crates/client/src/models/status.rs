//! Paper lifecycle status
//!
//! The backend owns every transition. The client only decodes whatever value
//! it reports, so unrecognized values are kept verbatim in `Other`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a paper in the ingestion pipeline
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaperStatus {
    Pending,
    Crawled,
    Downloading,
    Parsed,
    Analyzed,
    Embedded,
    Ready,
    /// A value outside the known set, rendered as-is
    Other(String),
}

/// Badge color family for a known status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeTone {
    Gray,
    Blue,
    Yellow,
    Indigo,
    Purple,
    Cyan,
    Green,
}

/// Display form of a status. `tone` is `None` for unknown values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub tone: Option<BadgeTone>,
}

impl PaperStatus {
    /// Known states in pipeline order
    pub const KNOWN: [PaperStatus; 7] = [
        PaperStatus::Pending,
        PaperStatus::Crawled,
        PaperStatus::Downloading,
        PaperStatus::Parsed,
        PaperStatus::Analyzed,
        PaperStatus::Embedded,
        PaperStatus::Ready,
    ];

    /// Wire value
    pub fn as_str(&self) -> &str {
        match self {
            PaperStatus::Pending => "pending",
            PaperStatus::Crawled => "crawled",
            PaperStatus::Downloading => "downloading",
            PaperStatus::Parsed => "parsed",
            PaperStatus::Analyzed => "analyzed",
            PaperStatus::Embedded => "embedded",
            PaperStatus::Ready => "ready",
            PaperStatus::Other(raw) => raw,
        }
    }

    /// Position in the pipeline, `None` for unknown values
    pub fn stage(&self) -> Option<u8> {
        match self {
            PaperStatus::Pending => Some(0),
            PaperStatus::Crawled => Some(1),
            PaperStatus::Downloading => Some(2),
            PaperStatus::Parsed => Some(3),
            PaperStatus::Analyzed => Some(4),
            PaperStatus::Embedded => Some(5),
            PaperStatus::Ready => Some(6),
            PaperStatus::Other(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PaperStatus::Other(_))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PaperStatus::Ready)
    }

    /// Analysis has finished (analyzed, embedded or ready)
    pub fn is_analyzed(&self) -> bool {
        matches!(
            self,
            PaperStatus::Analyzed | PaperStatus::Embedded | PaperStatus::Ready
        )
    }

    /// Still moving through the early pipeline stages
    pub fn is_processing(&self) -> bool {
        matches!(
            self,
            PaperStatus::Pending
                | PaperStatus::Crawled
                | PaperStatus::Downloading
                | PaperStatus::Parsed
        )
    }

    /// Human-readable label. Unknown values label as the raw string.
    pub fn label(&self) -> &str {
        match self {
            PaperStatus::Pending => "Pending",
            PaperStatus::Crawled => "Crawled",
            PaperStatus::Downloading => "Downloading",
            PaperStatus::Parsed => "Parsed",
            PaperStatus::Analyzed => "Analyzed",
            PaperStatus::Embedded => "Embedded",
            PaperStatus::Ready => "Ready",
            PaperStatus::Other(raw) => raw,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        let tone = match self {
            PaperStatus::Pending => Some(BadgeTone::Gray),
            PaperStatus::Crawled => Some(BadgeTone::Blue),
            PaperStatus::Downloading => Some(BadgeTone::Yellow),
            PaperStatus::Parsed => Some(BadgeTone::Indigo),
            PaperStatus::Analyzed => Some(BadgeTone::Purple),
            PaperStatus::Embedded => Some(BadgeTone::Cyan),
            PaperStatus::Ready => Some(BadgeTone::Green),
            PaperStatus::Other(_) => None,
        };
        StatusBadge {
            label: self.label().to_string(),
            tone,
        }
    }
}

impl From<String> for PaperStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => PaperStatus::Pending,
            "crawled" => PaperStatus::Crawled,
            "downloading" => PaperStatus::Downloading,
            "parsed" => PaperStatus::Parsed,
            "analyzed" => PaperStatus::Analyzed,
            "embedded" => PaperStatus::Embedded,
            "ready" => PaperStatus::Ready,
            _ => PaperStatus::Other(s),
        }
    }
}

impl From<&str> for PaperStatus {
    fn from(s: &str) -> Self {
        PaperStatus::from(s.to_string())
    }
}

impl From<PaperStatus> for String {
    fn from(status: PaperStatus) -> Self {
        match status {
            PaperStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values_decode() {
        let status: PaperStatus = serde_json::from_str("\"embedded\"").unwrap();
        assert_eq!(status, PaperStatus::Embedded);
        assert_eq!(status.stage(), Some(5));
    }

    #[test]
    fn test_unknown_value_is_preserved() {
        let status: PaperStatus = serde_json::from_str("\"translating\"").unwrap();
        assert_eq!(status, PaperStatus::Other("translating".into()));
        assert!(!status.is_known());
        assert_eq!(status.stage(), None);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"translating\"");
    }

    #[test]
    fn test_unknown_badge_is_unstyled() {
        let badge = PaperStatus::from("failed").badge();
        assert_eq!(badge.label, "failed");
        assert_eq!(badge.tone, None);

        let badge = PaperStatus::Ready.badge();
        assert_eq!(badge.label, "Ready");
        assert_eq!(badge.tone, Some(BadgeTone::Green));
    }

    #[test]
    fn test_known_states_are_strictly_ordered() {
        let stages: Vec<u8> = PaperStatus::KNOWN.iter().filter_map(|s| s.stage()).collect();
        assert_eq!(stages, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_progress_groups_partition_known_states() {
        for status in PaperStatus::KNOWN.iter() {
            assert_ne!(status.is_analyzed(), status.is_processing(), "{status}");
        }
        let other = PaperStatus::from("archived");
        assert!(!other.is_analyzed());
        assert!(!other.is_processing());
    }
}
