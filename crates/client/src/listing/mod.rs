//! Paper listing controller
//!
//! Holds the listing query (page, category, status, free text) and the last
//! fetched page. Load failures fall back to an empty list instead of an error.
//! Free-text search filters the fetched page locally and never refetches.

use tracing::{debug, warn};

use crate::api::{ApiResult, ListQuery, PaperApi};
use crate::config::ListingConfig;
use crate::metrics;
use crate::models::{PaperListItem, PaperStatus};

/// Categories offered by the listing filter
pub const CATEGORY_OPTIONS: [&str; 5] = ["cs.AI", "cs.CL", "cs.CV", "cs.LG", "stat.ML"];

/// Statuses offered by the listing filter
pub const STATUS_FILTER_OPTIONS: [PaperStatus; 5] = [
    PaperStatus::Pending,
    PaperStatus::Crawled,
    PaperStatus::Parsed,
    PaperStatus::Analyzed,
    PaperStatus::Ready,
];

/// Handle for one in-flight load, stamped with the generation that issued it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub query: ListQuery,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What `complete_load` did with a response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page replaced the visible list
    Applied,
    /// The request failed and the list was emptied
    Absorbed,
    /// A newer load was issued after this one; the response was dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct PaperListing {
    page: u32,
    page_size: u32,
    category: String,
    status: String,
    search_query: String,
    papers: Vec<PaperListItem>,
    loading: bool,
    generation: u64,
}

impl PaperListing {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            category: String::new(),
            status: String::new(),
            search_query: String::new(),
            papers: Vec::new(),
            loading: false,
            generation: 0,
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(config.page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn status_filter(&self) -> &str {
        &self.status
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last fetched page, before free-text filtering
    pub fn papers(&self) -> &[PaperListItem] {
        &self.papers
    }

    /// Papers on the fetched page matching the search query
    pub fn visible(&self) -> Vec<&PaperListItem> {
        if self.search_query.is_empty() {
            return self.papers.iter().collect();
        }
        let needle = self.search_query.to_lowercase();
        self.papers
            .iter()
            .filter(|paper| paper.matches_lowercase(&needle))
            .collect()
    }

    /// Nothing to show once loading has finished
    pub fn is_empty(&self) -> bool {
        !self.loading && self.visible().is_empty()
    }

    /// A full page suggests more may follow. The backend reports no total,
    /// so the next page can still come back empty.
    pub fn has_next_page(&self) -> bool {
        self.papers.len() >= self.page_size as usize
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// Change the category filter and return to page 1.
    /// Returns whether the query changed and a reload is due.
    pub fn set_category(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        let changed = category != self.category || self.page != 1;
        self.category = category;
        self.page = 1;
        changed
    }

    /// Change the status filter and return to page 1.
    /// Returns whether the query changed and a reload is due.
    pub fn set_status_filter(&mut self, status: impl Into<String>) -> bool {
        let status = status.into();
        let changed = status != self.status || self.page != 1;
        self.status = status;
        self.page = 1;
        changed
    }

    /// Update the free-text filter. Never triggers a reload.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Query for the current state. Empty filters are omitted.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: Some(self.page),
            page_size: Some(self.page_size),
            category: Some(self.category.clone()).filter(|c| !c.is_empty()),
            status: Some(self.status.clone()).filter(|s| !s.is_empty()),
        }
    }

    /// Mark a load in flight. Any earlier outstanding ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
            query: self.query(),
        }
    }

    /// Apply the response for `ticket`, unless a newer load superseded it
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: ApiResult<Vec<PaperListItem>>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Dropping stale listing response"
            );
            return LoadOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(papers) => {
                debug!(page = self.page, count = papers.len(), "Listing page loaded");
                self.papers = papers;
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!(error = %e, page = self.page, "Listing load failed, showing empty list");
                metrics::record_soft_failure("listing");
                self.papers.clear();
                LoadOutcome::Absorbed
            }
        }
    }

    /// Fetch the current page. Failures are absorbed into an empty list.
    pub async fn load(&mut self, api: &dyn PaperApi) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = api.list_papers(&ticket.query).await;
        self.complete_load(ticket, result)
    }
}

impl Default for PaperListing {
    fn default() -> Self {
        Self::new(crate::DEFAULT_PAGE_SIZE)
    }
}
