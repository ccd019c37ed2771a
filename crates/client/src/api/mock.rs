//! Scripted `PaperApi` for tests
//!
//! Each operation pops the next scripted result from its own queue. An empty
//! queue answers with a 503 so unscripted calls show up as failures.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use super::{ApiResult, ListQuery, PaperApi};
use crate::errors::TransportError;
use crate::models::{
    ChatRequest, ChatResponse, CrawlAccepted, PaperDetail, PaperListItem, PaperStatus,
    SubmitPaperRequest, SubmitPaperResponse, TaskStatus,
};

/// A call received by the mock, with its arguments
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    ListPapers(ListQuery),
    GetPaper(i64),
    SubmitPapers(SubmitPaperRequest),
    TriggerCrawl,
    TaskStatus(String),
    Chat(ChatRequest),
}

#[derive(Default)]
struct MockState {
    calls: Vec<ApiCall>,
    papers: VecDeque<ApiResult<Vec<PaperListItem>>>,
    details: VecDeque<ApiResult<PaperDetail>>,
    submissions: VecDeque<ApiResult<SubmitPaperResponse>>,
    crawls: VecDeque<ApiResult<CrawlAccepted>>,
    statuses: VecDeque<ApiResult<TaskStatus>>,
    chats: VecDeque<ApiResult<ChatResponse>>,
}

/// Mock API for testing
#[derive(Default)]
pub struct MockPaperApi {
    state: Mutex<MockState>,
}

fn unscripted<T>(operation: &str) -> ApiResult<T> {
    Err(TransportError::Status {
        status: 503,
        body: format!("no scripted response for {}", operation),
    })
}

impl MockPaperApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push_papers(&self, result: ApiResult<Vec<PaperListItem>>) -> &Self {
        self.state().papers.push_back(result);
        self
    }

    pub fn push_detail(&self, result: ApiResult<PaperDetail>) -> &Self {
        self.state().details.push_back(result);
        self
    }

    pub fn push_submission(&self, result: ApiResult<SubmitPaperResponse>) -> &Self {
        self.state().submissions.push_back(result);
        self
    }

    pub fn push_crawl(&self, result: ApiResult<CrawlAccepted>) -> &Self {
        self.state().crawls.push_back(result);
        self
    }

    pub fn push_task_status(&self, result: ApiResult<TaskStatus>) -> &Self {
        self.state().statuses.push_back(result);
        self
    }

    pub fn push_chat(&self, result: ApiResult<ChatResponse>) -> &Self {
        self.state().chats.push_back(result);
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }
}

#[async_trait]
impl PaperApi for MockPaperApi {
    async fn list_papers(&self, query: &ListQuery) -> ApiResult<Vec<PaperListItem>> {
        let mut state = self.state();
        state.calls.push(ApiCall::ListPapers(query.clone()));
        state.papers.pop_front().unwrap_or_else(|| unscripted("list_papers"))
    }

    async fn get_paper(&self, id: i64) -> ApiResult<PaperDetail> {
        let mut state = self.state();
        state.calls.push(ApiCall::GetPaper(id));
        state.details.pop_front().unwrap_or_else(|| unscripted("get_paper"))
    }

    async fn submit_papers(&self, request: &SubmitPaperRequest) -> ApiResult<SubmitPaperResponse> {
        let mut state = self.state();
        state.calls.push(ApiCall::SubmitPapers(request.clone()));
        state.submissions.pop_front().unwrap_or_else(|| unscripted("submit_papers"))
    }

    async fn trigger_crawl(&self) -> ApiResult<CrawlAccepted> {
        let mut state = self.state();
        state.calls.push(ApiCall::TriggerCrawl);
        state.crawls.pop_front().unwrap_or_else(|| unscripted("trigger_crawl"))
    }

    async fn task_status(&self, task_id: &str) -> ApiResult<TaskStatus> {
        let mut state = self.state();
        state.calls.push(ApiCall::TaskStatus(task_id.to_string()));
        state.statuses.pop_front().unwrap_or_else(|| unscripted("task_status"))
    }

    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        let mut state = self.state();
        state.calls.push(ApiCall::Chat(request.clone()));
        state.chats.pop_front().unwrap_or_else(|| unscripted("chat"))
    }
}

/// Minimal arXiv paper in list form
pub fn fixture_paper(id: i64, title: &str, status: &str) -> PaperListItem {
    PaperListItem {
        id,
        source: "arxiv".to_string(),
        source_id: format!("2401.{:05}", id),
        title: title.to_string(),
        abstract_text: None,
        published_at: None,
        categories: Some(vec!["cs.AI".to_string()]),
        keywords: None,
        status: PaperStatus::from(status),
        authors: Vec::new(),
    }
}
