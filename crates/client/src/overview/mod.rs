//! Home view: newest papers preview, library stats and the crawl trigger
//!
//! Both the preview load and the crawl trigger fail soft.

use tracing::{debug, warn};

use crate::api::{ListQuery, PaperApi};
use crate::config::ListingConfig;
use crate::metrics;
use crate::models::PaperListItem;
use crate::tasks::CrawlTracker;

/// Shown in place of a zero stat
pub const EMPTY_STAT: &str = "—";

/// Counts over the preview page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total: usize,
    pub analyzed: usize,
    pub processing: usize,
}

impl LibraryStats {
    pub fn from_papers(papers: &[PaperListItem]) -> Self {
        Self {
            total: papers.len(),
            analyzed: papers.iter().filter(|p| p.status.is_analyzed()).count(),
            processing: papers.iter().filter(|p| p.status.is_processing()).count(),
        }
    }

    /// The preview is one page, so the real total is at least this
    pub fn total_label(&self) -> String {
        if self.total == 0 {
            EMPTY_STAT.to_string()
        } else {
            format!("{}+", self.total)
        }
    }

    pub fn analyzed_label(&self) -> String {
        count_label(self.analyzed)
    }

    pub fn processing_label(&self) -> String {
        count_label(self.processing)
    }
}

fn count_label(count: usize) -> String {
    if count == 0 {
        EMPTY_STAT.to_string()
    } else {
        count.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct LibraryOverview {
    preview_size: u32,
    papers: Vec<PaperListItem>,
    loading: bool,
    crawl: CrawlTracker,
}

impl LibraryOverview {
    pub fn new(preview_size: u32) -> Self {
        Self {
            preview_size: preview_size.max(1),
            papers: Vec::new(),
            loading: false,
            crawl: CrawlTracker::new(),
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(config.preview_size)
    }

    pub fn papers(&self) -> &[PaperListItem] {
        &self.papers
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_crawling(&self) -> bool {
        self.crawl.is_in_flight()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_papers(&self.papers)
    }

    /// Fetch the newest papers. A failure leaves the preview as it was.
    pub async fn load(&mut self, api: &dyn PaperApi) {
        self.loading = true;
        match api.list_papers(&ListQuery::page(1, self.preview_size)).await {
            Ok(papers) => {
                debug!(count = papers.len(), "Overview preview loaded");
                self.papers = papers;
            }
            Err(e) => {
                warn!(error = %e, "Overview preview failed, keeping previous papers");
                metrics::record_soft_failure("overview");
            }
        }
        self.loading = false;
    }

    /// Fire the crawl trigger. Returns whether the backend accepted it;
    /// failures are logged and otherwise ignored.
    pub async fn trigger_crawl(&mut self, api: &dyn PaperApi) -> bool {
        match self.crawl.trigger(api).await {
            Ok(accepted) => accepted.is_some(),
            Err(_) => {
                metrics::record_soft_failure("crawl");
                false
            }
        }
    }
}

impl Default for LibraryOverview {
    fn default() -> Self {
        Self::from_config(&ListingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{fixture_paper, ApiCall, MockPaperApi};
    use crate::errors::TransportError;
    use crate::models::{CrawlAccepted, TaskState};

    #[tokio::test]
    async fn test_preview_requests_first_page() {
        let api = MockPaperApi::new();
        api.push_papers(Ok(vec![
            fixture_paper(1, "A", "ready"),
            fixture_paper(2, "B", "embedded"),
            fixture_paper(3, "C", "downloading"),
            fixture_paper(4, "D", "failed"),
            fixture_paper(5, "E", "quarantined"),
        ]));

        let mut overview = LibraryOverview::new(6);
        overview.load(&api).await;

        assert_eq!(api.calls(), vec![ApiCall::ListPapers(ListQuery::page(1, 6))]);
        let stats = overview.stats();
        assert_eq!(stats, LibraryStats { total: 5, analyzed: 2, processing: 1 });
        assert_eq!(stats.total_label(), "5+");
        assert!(!overview.is_loading());
    }

    #[tokio::test]
    async fn test_failed_preview_shows_empty_stats() {
        let api = MockPaperApi::new();
        api.push_papers(Err(TransportError::Connection { message: "refused".into() }));

        let mut overview = LibraryOverview::default();
        overview.load(&api).await;

        let stats = overview.stats();
        assert_eq!(stats.total_label(), EMPTY_STAT);
        assert_eq!(stats.analyzed_label(), EMPTY_STAT);
        assert_eq!(stats.processing_label(), EMPTY_STAT);
        assert!(!overview.is_loading());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_papers() {
        let api = MockPaperApi::new();
        api.push_papers(Ok(vec![fixture_paper(1, "A", "ready"), fixture_paper(2, "B", "parsed")]))
            .push_papers(Err(TransportError::Status { status: 503, body: "busy".into() }));

        let mut overview = LibraryOverview::default();
        overview.load(&api).await;
        overview.load(&api).await;

        let ids: Vec<i64> = overview.papers().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(overview.stats().total_label(), "2+");
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test]
    async fn test_crawl_failure_is_absorbed() {
        let api = MockPaperApi::new();
        api.push_crawl(Err(TransportError::Status { status: 500, body: "boom".into() }))
            .push_crawl(Ok(CrawlAccepted {
                status: TaskState::NotImplemented,
                task_id: None,
                message: Some("Crawl tasks will be available in Phase 2".into()),
            }));

        let mut overview = LibraryOverview::default();
        assert!(!overview.trigger_crawl(&api).await);
        assert!(!overview.is_crawling());
        assert!(overview.trigger_crawl(&api).await);
    }
}
