//! Client-side metrics
//!
//! Records through the `metrics` facade. Nothing is exported unless the host
//! program installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

use crate::models::Severity;

/// Metrics prefix for all client metrics
pub const METRICS_PREFIX: &str = "dailypapers_client";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of API requests by operation and outcome"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "API request latency in seconds"
    );

    describe_counter!(
        format!("{}_soft_failures_total", METRICS_PREFIX),
        Unit::Count,
        "Transport failures absorbed into an empty or placeholder view"
    );

    describe_counter!(
        format!("{}_submission_results_total", METRICS_PREFIX),
        Unit::Count,
        "Per-identifier submission outcomes by severity"
    );

    describe_counter!(
        format!("{}_chat_turns_total", METRICS_PREFIX),
        Unit::Count,
        "Completed conversation turns"
    );

    describe_counter!(
        format!("{}_task_polls_total", METRICS_PREFIX),
        Unit::Count,
        "Task status checks issued by the poller"
    );

    tracing::debug!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    operation: &'static str,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Time since `start`, for log fields
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Record request completion. `outcome` is a status code or error kind.
    pub fn finish(self, outcome: &str) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "operation" => self.operation,
            "outcome" => outcome.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "operation" => self.operation
        )
        .record(duration);
    }
}

/// A transport failure was absorbed by `component`
pub fn record_soft_failure(component: &'static str) {
    counter!(
        format!("{}_soft_failures_total", METRICS_PREFIX),
        "component" => component
    )
    .increment(1);
}

pub fn record_submission(severity: Severity) {
    let label = match severity {
        Severity::Success => "success",
        Severity::Warning => "warning",
        Severity::Failure => "failure",
    };
    counter!(
        format!("{}_submission_results_total", METRICS_PREFIX),
        "severity" => label
    )
    .increment(1);
}

pub fn record_chat_turn(answered: bool) {
    counter!(
        format!("{}_chat_turns_total", METRICS_PREFIX),
        "answered" => if answered { "true" } else { "false" }
    )
    .increment(1);
}

pub fn record_task_poll() {
    counter!(format!("{}_task_polls_total", METRICS_PREFIX)).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        register_metrics();
        let request = RequestMetrics::start("list_papers");
        request.finish("200");
        record_soft_failure("listing");
        record_submission(Severity::Warning);
        record_chat_turn(false);
        record_task_poll();
    }

    #[test]
    fn test_elapsed_ms_grows() {
        let request = RequestMetrics::start("get_paper");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(request.elapsed_ms() >= 5);
        request.finish("200");
    }
}
