//! Controllers driven together through the public API

use std::time::Duration;

use dailypapers_client::api::{fixture_paper, ApiCall, ListQuery, MockPaperApi};
use dailypapers_client::conversation::{ConversationSession, PLACEHOLDER_REPLY};
use dailypapers_client::listing::{LoadOutcome, PaperListing};
use dailypapers_client::models::{
    ChatResponse, CrawlAccepted, PaperSource, Severity, SubmitOutcome, SubmitPaperResponse,
    SubmitPaperResult, TaskState, TaskStatus,
};
use dailypapers_client::submission::SubmissionForm;
use dailypapers_client::tasks::{CrawlTracker, PollPolicy, TaskPoller};
use dailypapers_client::TransportError;

fn queued(source_id: &str, paper_id: i64) -> SubmitPaperResult {
    SubmitPaperResult {
        source_id: source_id.into(),
        status: SubmitOutcome::Queued,
        paper_id: Some(paper_id),
        message: "ok".into(),
    }
}

#[tokio::test]
async fn submit_then_browse_new_papers() {
    let api = MockPaperApi::new();
    api.push_submission(Ok(SubmitPaperResponse {
        total: 2,
        results: vec![
            queued("1706.03762", 1),
            SubmitPaperResult {
                source_id: "2401.99999".into(),
                status: SubmitOutcome::NotFound,
                paper_id: None,
                message: "Paper 2401.99999 not found on arxiv".into(),
            },
        ],
    }));
    api.push_papers(Ok(vec![fixture_paper(1, "Attention Is All You Need", "pending")]));

    let mut form = SubmissionForm::new(PaperSource::Arxiv);
    let batch = form
        .submit(&api, "1706.03762, 2401.99999")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(batch.count(Severity::Success), 1);
    assert_eq!(batch.count(Severity::Failure), 1);

    let mut listing = PaperListing::new(20);
    listing.set_status_filter("pending");
    assert_eq!(listing.load(&api).await, LoadOutcome::Applied);
    assert_eq!(listing.visible().len(), 1);

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        ApiCall::ListPapers(ListQuery {
            status: Some("pending".into()),
            ..ListQuery::page(1, 20)
        })
    );
}

#[tokio::test]
async fn independent_controllers_run_at_once() {
    let api = MockPaperApi::new();
    api.push_papers(Err(TransportError::Status { status: 503, body: "warming up".into() }));
    api.push_chat(Err(TransportError::Status { status: 501, body: "Not implemented".into() }));
    api.push_crawl(Ok(CrawlAccepted {
        status: TaskState::Pending,
        task_id: Some("crawl-9".into()),
        message: None,
    }));

    let mut listing = PaperListing::default();
    let mut session = ConversationSession::new();
    let mut tracker = CrawlTracker::new();

    let (outcome, reply, crawl) = futures::join!(
        listing.load(&api),
        session.submit(&api, "What is new in RLHF?"),
        tracker.trigger(&api),
    );

    assert_eq!(outcome, LoadOutcome::Absorbed);
    assert_eq!(reply.map(|m| m.content.clone()).as_deref(), Some(PLACEHOLDER_REPLY));
    assert_eq!(crawl.unwrap().and_then(|a| a.task_id).as_deref(), Some("crawl-9"));
    assert_eq!(api.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn crawl_and_wait_for_completion() {
    let api = MockPaperApi::new();
    api.push_crawl(Ok(CrawlAccepted {
        status: TaskState::Pending,
        task_id: Some("crawl-1".into()),
        message: None,
    }));
    for state in ["PENDING", "STARTED", "SUCCESS"] {
        api.push_task_status(Ok(TaskStatus {
            task_id: "crawl-1".into(),
            status: TaskState::from(state.to_string()),
            result: None,
            error: None,
        }));
    }

    let mut tracker = CrawlTracker::new();
    let accepted = tracker.trigger(&api).await.unwrap().unwrap();
    let task_id = accepted.task_id.unwrap();

    let poller = TaskPoller::new(&api, PollPolicy::fixed(Duration::from_secs(2), 10));
    let finished = poller.wait(&task_id).await.unwrap();

    assert!(finished.is_success());
    assert_eq!(
        api.calls(),
        vec![
            ApiCall::TriggerCrawl,
            ApiCall::TaskStatus("crawl-1".into()),
            ApiCall::TaskStatus("crawl-1".into()),
            ApiCall::TaskStatus("crawl-1".into()),
        ]
    );
}

#[tokio::test]
async fn conversation_recovers_after_failure() {
    let api = MockPaperApi::new();
    api.push_chat(Err(TransportError::Connection { message: "refused".into() }));
    api.push_chat(Ok(ChatResponse {
        answer: "Two papers discuss it.".into(),
        source_papers: vec![4, 9],
        source_chunks: vec![],
    }));

    let mut session = ConversationSession::new();
    session.submit(&api, "first try").await;
    let reply = session.submit(&api, "second try").await.unwrap();

    assert_eq!(reply.cited_papers(), &[4, 9]);
    assert_eq!(session.messages().len(), 4);
    assert_eq!(session.messages()[1].content, PLACEHOLDER_REPLY);
}
