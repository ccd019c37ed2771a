//! Single paper detail view
//!
//! Unlike the listing, a failed fetch here is shown to the user.

use tracing::{debug, warn};

use crate::api::{ApiResult, PaperApi};
use crate::models::PaperDetail;

#[derive(Debug, Clone, Default)]
pub struct PaperDetailView {
    requested: Option<i64>,
    paper: Option<PaperDetail>,
    error: Option<String>,
    loading: bool,
}

impl PaperDetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paper(&self) -> Option<&PaperDetail> {
        self.paper.as_ref()
    }

    /// Inline error text from the last failed fetch
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start loading `id`, clearing any previous error
    pub fn begin_load(&mut self, id: i64) -> i64 {
        self.requested = Some(id);
        self.loading = true;
        self.error = None;
        id
    }

    /// Returns false when the response belongs to an id no longer requested
    pub fn complete_load(&mut self, id: i64, result: ApiResult<PaperDetail>) -> bool {
        if self.requested != Some(id) {
            debug!(id, requested = ?self.requested, "Dropping detail response for another paper");
            return false;
        }

        self.loading = false;
        match result {
            Ok(paper) => {
                self.paper = Some(paper);
                self.error = None;
            }
            Err(e) => {
                warn!(id, error = %e, "Paper detail load failed");
                self.paper = None;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    pub async fn load(&mut self, api: &dyn PaperApi, id: i64) -> bool {
        let id = self.begin_load(id);
        let result = api.get_paper(id).await;
        self.complete_load(id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{fixture_paper, MockPaperApi};
    use crate::errors::TransportError;
    use chrono::Utc;

    fn detail(id: i64) -> PaperDetail {
        PaperDetail {
            paper: fixture_paper(id, "Mixture of Experts", "embedded"),
            summary: Some("Sparse routing.".into()),
            summary_zh: None,
            contributions: None,
            pdf_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failure_surfaces_message() {
        let api = MockPaperApi::new();
        api.push_detail(Ok(detail(5)));
        api.push_detail(Err(TransportError::Status { status: 500, body: "db down".into() }));

        let mut view = PaperDetailView::new();
        assert!(view.load(&api, 5).await);
        assert_eq!(view.paper().map(|p| p.id()), Some(5));

        assert!(view.load(&api, 6).await);
        assert!(view.paper().is_none());
        assert_eq!(view.error(), Some("500: db down"));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_response_for_previous_id_is_dropped() {
        let mut view = PaperDetailView::new();
        let old = view.begin_load(1);
        let new = view.begin_load(2);

        assert!(view.complete_load(new, Ok(detail(2))));
        assert!(!view.complete_load(old, Ok(detail(1))));
        assert_eq!(view.paper().map(|p| p.id()), Some(2));
    }
}
