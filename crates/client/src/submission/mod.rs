//! Batch paper submission
//!
//! Turns free-form user input into one submit request and annotates the
//! per-identifier receipts for display. Receipts are kept exactly as the
//! backend returned them, in the same order.

use tracing::{debug, info, warn};
use validator::Validate;

use crate::api::{ApiResult, PaperApi};
use crate::errors::{ClientError, ValidationError};
use crate::metrics;
use crate::models::{
    PaperSource, Severity, SubmitPaperRequest, SubmitPaperResponse, SubmitPaperResult,
};
use crate::MAX_SUBMIT_BATCH;

/// Split raw input on newlines and commas, trimming and dropping empty
/// tokens. Repeated identifiers are kept; deduplication is the backend's job.
pub fn parse_paper_ids(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pre-flight batch checks, run through the request's `Validate` rules
pub fn validate_request(request: &SubmitPaperRequest) -> Result<(), ValidationError> {
    request.validate().map_err(|e| {
        debug!(errors = %e, "Submission rejected before sending");
        match request.paper_ids.len() {
            0 => ValidationError::EmptyInput,
            count => ValidationError::BatchTooLarge {
                count,
                limit: MAX_SUBMIT_BATCH,
            },
        }
    })
}

/// A receipt plus how to present it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
    pub result: SubmitPaperResult,
    pub severity: Severity,
}

/// Receipts of one submission in server order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconciledBatch {
    total: usize,
    rows: Vec<ResultRow>,
}

impl ReconciledBatch {
    pub fn from_response(response: SubmitPaperResponse) -> Self {
        if response.total != response.results.len() {
            debug!(
                total = response.total,
                results = response.results.len(),
                "Submission total differs from result count"
            );
        }
        let rows = response
            .results
            .into_iter()
            .map(|result| ResultRow {
                severity: result.status.severity(),
                result,
            })
            .collect();
        Self {
            total: response.total,
            rows,
        }
    }

    /// Total reported by the backend
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.rows.iter().filter(|row| row.severity == severity).count()
    }
}

/// Submission form state
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    source: PaperSource,
    in_flight: bool,
    results: Option<ReconciledBatch>,
    error: Option<String>,
}

impl SubmissionForm {
    pub fn new(source: PaperSource) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    pub fn source(&self) -> PaperSource {
        self.source
    }

    pub fn set_source(&mut self, source: PaperSource) {
        self.source = source;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn results(&self) -> Option<&ReconciledBatch> {
        self.results.as_ref()
    }

    /// Inline error text (validation or transport)
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Parse and validate `raw`, clearing the previous outcome.
    ///
    /// Returns `Ok(None)` while an earlier submission is still in flight.
    /// A validation failure is recorded inline and no request is produced.
    pub fn begin_submit(
        &mut self,
        raw: &str,
    ) -> Result<Option<SubmitPaperRequest>, ValidationError> {
        if self.in_flight {
            debug!("Submission already in flight, ignoring");
            return Ok(None);
        }

        self.error = None;
        self.results = None;

        let request = SubmitPaperRequest::new(self.source, parse_paper_ids(raw));
        if let Err(e) = validate_request(&request) {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.in_flight = true;
        Ok(Some(request))
    }

    /// Record the backend's answer. All or nothing: a failure leaves no rows.
    pub fn complete_submit(
        &mut self,
        result: ApiResult<SubmitPaperResponse>,
    ) -> Result<&ReconciledBatch, ClientError> {
        self.in_flight = false;
        match result {
            Ok(response) => {
                let batch = ReconciledBatch::from_response(response);
                for row in batch.rows() {
                    metrics::record_submission(row.severity);
                }
                info!(
                    total = batch.total(),
                    queued = batch.count(Severity::Success),
                    duplicate = batch.count(Severity::Warning),
                    failed = batch.count(Severity::Failure),
                    "Submission reconciled"
                );
                let batch = self.results.insert(batch);
                Ok(&*batch)
            }
            Err(e) => {
                warn!(error = %e, "Submission failed");
                self.results = None;
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Validate, submit and reconcile in one step. Nothing is sent when
    /// validation fails or a submission is already in flight.
    pub async fn submit(
        &mut self,
        api: &dyn PaperApi,
        raw: &str,
    ) -> Result<Option<&ReconciledBatch>, ClientError> {
        let Some(request) = self.begin_submit(raw)? else {
            return Ok(None);
        };
        info!(source = %request.source, count = request.paper_ids.len(), "Submitting papers");
        let result = api.submit_papers(&request).await;
        self.complete_submit(result).map(Some)
    }
}
