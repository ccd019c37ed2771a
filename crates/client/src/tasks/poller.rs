//! Task status polling policy
//!
//! Repeats the single-shot status query until the task reaches a terminal
//! state. Delays grow exponentially between checks. Polling gives up after
//! `max_attempts` checks or once the backoff's elapsed-time budget runs out.

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::api::PaperApi;
use crate::config::PollingConfig;
use crate::errors::{PollError, TransportError};
use crate::metrics;
use crate::models::{TaskState, TaskStatus};

/// Interval and stop rules for a poll loop
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
    pub randomization_factor: f64,
    pub max_attempts: Option<u32>,
    pub max_elapsed: Option<Duration>,
}

impl PollPolicy {
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(config.initial_interval_ms),
            max_interval: Duration::from_millis(config.max_interval_ms),
            multiplier: config.multiplier,
            randomization_factor: config.randomization_factor,
            max_attempts: config.max_attempts,
            max_elapsed: config.max_elapsed_secs.map(Duration::from_secs),
        }
    }

    /// Fixed delays, no jitter
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            initial_interval: interval,
            max_interval: interval,
            multiplier: 1.0,
            randomization_factor: 0.0,
            max_attempts: Some(max_attempts),
            max_elapsed: None,
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_randomization_factor(self.randomization_factor)
            .with_max_elapsed_time(self.max_elapsed)
            .build()
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

pub struct TaskPoller<'a> {
    api: &'a dyn PaperApi,
    policy: PollPolicy,
}

impl<'a> TaskPoller<'a> {
    pub fn new(api: &'a dyn PaperApi, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Poll until the task is terminal
    pub async fn wait(&self, task_id: &str) -> Result<TaskStatus, PollError> {
        self.wait_with(task_id, |_| {}).await
    }

    /// Poll until the task is terminal, reporting every non-terminal status
    /// to `on_progress`.
    ///
    /// A failed query counts as an attempt and polling carries on. When the
    /// attempts run out right after a failed query, that failure is returned.
    #[instrument(skip(self, on_progress))]
    pub async fn wait_with<F>(
        &self,
        task_id: &str,
        mut on_progress: F,
    ) -> Result<TaskStatus, PollError>
    where
        F: FnMut(&TaskStatus),
    {
        let mut backoff = self.policy.backoff();
        let mut attempts: u32 = 0;
        let mut last_state: Option<TaskState> = None;
        let mut last_error: Option<TransportError> = None;

        loop {
            attempts += 1;
            metrics::record_task_poll();

            match super::query_status(self.api, task_id).await {
                Ok(status) if status.is_terminal() => {
                    info!(attempts, status = %status.status, "Task finished");
                    return Ok(status);
                }
                Ok(status) => {
                    debug!(attempts, status = %status.status, "Task still running");
                    last_error = None;
                    last_state = Some(status.status.clone());
                    on_progress(&status);
                }
                Err(e) => {
                    warn!(attempts, error = %e, "Task status query failed");
                    last_error = Some(e);
                }
            }

            if self.policy.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(give_up(task_id, attempts, last_state, last_error));
            }

            match backoff.next_backoff() {
                Some(delay) => tokio::time::sleep(delay).await,
                None => return Err(give_up(task_id, attempts, last_state, last_error)),
            }
        }
    }
}

fn give_up(
    task_id: &str,
    attempts: u32,
    last_state: Option<TaskState>,
    last_error: Option<TransportError>,
) -> PollError {
    warn!(task_id, attempts, "Giving up on task");
    match last_error {
        Some(source) => PollError::Query {
            task_id: task_id.to_string(),
            attempts,
            source,
        },
        None => PollError::Exhausted {
            task_id: task_id.to_string(),
            attempts,
            last_status: last_state.map(String::from).unwrap_or_else(|| "unknown".into()),
        },
    }
}
