//! Platform API abstraction
//!
//! `PaperApi` is the only seam between the view controllers and the network.
//! Implementations:
//! - `HttpPaperApi`: reqwest client over the `/api/v1` contract
//! - `MockPaperApi`: scripted responses and call recording for tests

mod http;
mod mock;

pub use http::HttpPaperApi;
pub use mock::{fixture_paper, ApiCall, MockPaperApi};

use async_trait::async_trait;

use crate::errors::TransportError;
use crate::models::{
    ChatRequest, ChatResponse, CrawlAccepted, PaperDetail, PaperListItem, SubmitPaperRequest,
    SubmitPaperResponse, TaskStatus,
};

/// Result of a single API exchange
pub type ApiResult<T> = std::result::Result<T, TransportError>;

/// Query parameters for `GET /papers`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    /// Query-string pairs. Zero numbers and empty filters are left out.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size.filter(|s| *s > 0) {
            pairs.push(("page_size", size.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

/// Typed operations of the platform API.
///
/// Every call resolves once or fails once with a `TransportError`; there are
/// no retries and no caching behind this trait.
#[async_trait]
pub trait PaperApi: Send + Sync {
    /// `GET /papers`
    async fn list_papers(&self, query: &ListQuery) -> ApiResult<Vec<PaperListItem>>;

    /// `GET /papers/{id}`
    async fn get_paper(&self, id: i64) -> ApiResult<PaperDetail>;

    /// `POST /papers/submit`
    async fn submit_papers(&self, request: &SubmitPaperRequest) -> ApiResult<SubmitPaperResponse>;

    /// `POST /tasks/crawl`
    async fn trigger_crawl(&self) -> ApiResult<CrawlAccepted>;

    /// `GET /tasks/{task_id}`
    async fn task_status(&self, task_id: &str) -> ApiResult<TaskStatus>;

    /// `POST /chat`
    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_empty_filters() {
        let query = ListQuery {
            page: Some(2),
            page_size: Some(20),
            category: Some(String::new()),
            status: Some("ready".into()),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
                ("status", "ready".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_query_is_bare() {
        assert!(ListQuery::default().to_pairs().is_empty());
    }
}
