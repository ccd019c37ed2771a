//! Crawl task tracking
//!
//! Two separate primitives:
//! - `CrawlTracker` fires the crawl trigger and returns once the task is accepted
//! - `query_status` asks for a task's status exactly once
//!
//! Scheduling repeated status checks lives in [`poller`].

pub mod poller;

pub use poller::{PollPolicy, TaskPoller};

use tracing::{debug, info, instrument, warn};

use crate::api::{ApiResult, PaperApi};
use crate::models::{CrawlAccepted, TaskStatus};

/// Crawl trigger with its own in-flight flag
#[derive(Debug, Clone, Default)]
pub struct CrawlTracker {
    in_flight: bool,
    last_accepted: Option<CrawlAccepted>,
}

impl CrawlTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Most recent accepted trigger
    pub fn last_accepted(&self) -> Option<&CrawlAccepted> {
        self.last_accepted.as_ref()
    }

    /// Mark the trigger in flight. Returns false if one is already pending.
    pub fn begin_trigger(&mut self) -> bool {
        if self.in_flight {
            debug!("Crawl trigger already in flight");
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn complete_trigger(
        &mut self,
        result: ApiResult<CrawlAccepted>,
    ) -> ApiResult<CrawlAccepted> {
        self.in_flight = false;
        match result {
            Ok(accepted) => {
                info!(
                    status = %accepted.status,
                    task_id = accepted.task_id.as_deref().unwrap_or("-"),
                    "Crawl accepted"
                );
                self.last_accepted = Some(accepted.clone());
                Ok(accepted)
            }
            Err(e) => {
                warn!(error = %e, "Crawl trigger failed");
                Err(e)
            }
        }
    }

    /// Trigger a crawl. `Ok(None)` means an earlier trigger is still pending
    /// and no request was sent.
    pub async fn trigger(&mut self, api: &dyn PaperApi) -> ApiResult<Option<CrawlAccepted>> {
        if !self.begin_trigger() {
            return Ok(None);
        }
        let result = api.trigger_crawl().await;
        self.complete_trigger(result).map(Some)
    }
}

/// Ask for a task's status once
#[instrument(skip(api))]
pub async fn query_status(api: &dyn PaperApi, task_id: &str) -> ApiResult<TaskStatus> {
    let status = api.task_status(task_id).await?;
    debug!(status = %status.status, terminal = status.is_terminal(), "Task status");
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiCall, MockPaperApi};
    use crate::errors::TransportError;
    use crate::models::TaskState;

    fn accepted(task_id: &str) -> CrawlAccepted {
        CrawlAccepted {
            status: TaskState::Pending,
            task_id: Some(task_id.into()),
            message: None,
        }
    }

    #[tokio::test]
    async fn test_trigger_returns_on_acceptance() {
        let api = MockPaperApi::new();
        api.push_crawl(Ok(accepted("crawl-1")));

        let mut tracker = CrawlTracker::new();
        let result = tracker.trigger(&api).await.unwrap().unwrap();

        assert_eq!(result.task_id.as_deref(), Some("crawl-1"));
        assert!(!tracker.is_in_flight());
        assert_eq!(tracker.last_accepted(), Some(&result));
        assert_eq!(api.calls(), vec![ApiCall::TriggerCrawl]);
    }

    #[tokio::test]
    async fn test_failed_trigger_clears_in_flight() {
        let api = MockPaperApi::new();
        api.push_crawl(Err(TransportError::Status { status: 502, body: "bad gateway".into() }));

        let mut tracker = CrawlTracker::new();
        let err = tracker.trigger(&api).await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(!tracker.is_in_flight());
        assert!(tracker.last_accepted().is_none());
    }

    #[test]
    fn test_second_trigger_while_pending_is_refused() {
        let mut tracker = CrawlTracker::new();
        assert!(tracker.begin_trigger());
        assert!(!tracker.begin_trigger());
        let _ = tracker.complete_trigger(Ok(accepted("crawl-2")));
        assert!(tracker.begin_trigger());
    }

    #[tokio::test]
    async fn test_query_status_is_single_shot() {
        let api = MockPaperApi::new();
        api.push_task_status(Ok(TaskStatus {
            task_id: "crawl-1".into(),
            status: TaskState::Started,
            result: None,
            error: None,
        }));

        let status = query_status(&api, "crawl-1").await.unwrap();
        assert_eq!(status.status, TaskState::Started);
        assert_eq!(api.call_count(), 1);
    }
}
