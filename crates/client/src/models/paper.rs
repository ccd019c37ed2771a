//! Paper records as served by the platform

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PaperStatus;

/// Author copy embedded in a paper's author list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub affiliation: Option<String>,
}

/// Paper in list form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaperListItem {
    pub id: i64,

    /// External origin, e.g. "arxiv"
    pub source: String,

    /// Identifier within `source`
    pub source_id: String,

    pub title: String,

    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub categories: Option<Vec<String>>,

    #[serde(default)]
    pub keywords: Option<Vec<String>>,

    pub status: PaperStatus,

    /// Ordered as listed on the paper
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl PaperListItem {
    /// Case-insensitive substring match over title and abstract.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .abstract_text
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
    }

    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .as_ref()
            .is_some_and(|cats| cats.iter().any(|c| c == category))
    }
}

/// Paper in detail form, a superset of the list form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaperDetail {
    #[serde(flatten)]
    pub paper: PaperListItem,

    #[serde(default)]
    pub summary: Option<String>,

    /// Localized (Chinese) summary
    #[serde(default)]
    pub summary_zh: Option<String>,

    #[serde(default)]
    pub contributions: Option<Vec<String>>,

    #[serde(default)]
    pub pdf_url: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl PaperDetail {
    pub fn id(&self) -> i64 {
        self.paper.id
    }

    pub fn status(&self) -> &PaperStatus {
        &self.paper.status
    }
}
