//! reqwest implementation of `PaperApi`

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::field::Empty;
use tracing::{debug, instrument, warn, Span};

use super::{ApiResult, ListQuery, PaperApi};
use crate::config::ClientConfig;
use crate::errors::{ClientError, TransportError};
use crate::metrics::RequestMetrics;
use crate::models::{
    ChatRequest, ChatResponse, CrawlAccepted, PaperDetail, PaperListItem, SubmitPaperRequest,
    SubmitPaperResponse, TaskStatus,
};

/// HTTP client for the platform API
#[derive(Clone)]
pub struct HttpPaperApi {
    client: reqwest::Client,
    root: Url,
}

impl HttpPaperApi {
    /// Create a client rooted at `api_root`, e.g. `http://localhost:8000/api/v1`.
    /// With `timeout` unset a request waits as long as the server does.
    pub fn new(api_root: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let root = Url::parse(api_root).map_err(|e| ClientError::Configuration {
            message: format!("Invalid API root '{}': {}", api_root, e),
        })?;
        if root.cannot_be_a_base() {
            return Err(ClientError::Configuration {
                message: format!("API root '{}' cannot carry a path", api_root),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ClientError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, root })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_root(), config.request_timeout())
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Append path segments to the root. Segments are percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn builder(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client
            .request(method, self.url(segments))
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Send one request and decode the JSON body.
    ///
    /// Any non-2xx status becomes `TransportError::Status` with the body text.
    #[instrument(skip(self, builder), fields(method = Empty, url = Empty))]
    async fn request<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> ApiResult<T> {
        let metrics = RequestMetrics::start(operation);

        let request = builder.build().map_err(|e| {
            let err = TransportError::from(e);
            warn!(error = %err, "Request could not be built");
            err
        })?;
        let span = Span::current();
        span.record("method", request.method().as_str());
        span.record("url", request.url().as_str());

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                let err = TransportError::from(e);
                warn!(
                    error = %err,
                    elapsed_ms = metrics.elapsed_ms(),
                    "Request failed before a response arrived"
                );
                metrics.finish(err.kind());
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %body,
                elapsed_ms = metrics.elapsed_ms(),
                "Request rejected"
            );
            metrics.finish(status.as_str());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let decoded = response.json::<T>().await.map_err(|e| TransportError::Decode {
            message: e.to_string(),
        });
        match &decoded {
            Ok(_) => {
                debug!(
                    status = status.as_u16(),
                    elapsed_ms = metrics.elapsed_ms(),
                    "Request completed"
                );
                metrics.finish(status.as_str());
            }
            Err(e) => {
                warn!(
                    error = %e,
                    elapsed_ms = metrics.elapsed_ms(),
                    "Response body did not match the expected shape"
                );
                metrics.finish("decode");
            }
        }
        decoded
    }
}

#[async_trait]
impl PaperApi for HttpPaperApi {
    async fn list_papers(&self, query: &ListQuery) -> ApiResult<Vec<PaperListItem>> {
        let builder = self.builder(Method::GET, &["papers"]).query(&query.to_pairs());
        self.request("list_papers", builder).await
    }

    async fn get_paper(&self, id: i64) -> ApiResult<PaperDetail> {
        let id = id.to_string();
        let builder = self.builder(Method::GET, &["papers", &id]);
        self.request("get_paper", builder).await
    }

    async fn submit_papers(&self, request: &SubmitPaperRequest) -> ApiResult<SubmitPaperResponse> {
        let builder = self.builder(Method::POST, &["papers", "submit"]).json(request);
        self.request("submit_papers", builder).await
    }

    async fn trigger_crawl(&self) -> ApiResult<CrawlAccepted> {
        let builder = self.builder(Method::POST, &["tasks", "crawl"]);
        self.request("trigger_crawl", builder).await
    }

    async fn task_status(&self, task_id: &str) -> ApiResult<TaskStatus> {
        let builder = self.builder(Method::GET, &["tasks", task_id]);
        self.request("task_status", builder).await
    }

    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        let builder = self.builder(Method::POST, &["chat"]).json(request);
        self.request("chat", builder).await
    }
}
