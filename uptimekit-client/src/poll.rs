//! Polling for eventually-consistent deletion.
//!
//! After a DELETE succeeds, the backend may keep serving the resource for a
//! while. [`DeletionPoller`] GETs it on a capped exponential schedule until
//! it reports 404/410.
//!
//! States: `Polling` → `Confirmed` | `TimedOut` | `Cancelled`. Only
//! `Confirmed` is a success. Both the deadline and the cancellation token are
//! checked on every iteration, and no sleep or request runs past either. A
//! timeout too large to add to the current instant means no deadline.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ClientError;
use crate::executor::RequestExecutor;
use crate::request::EndpointCall;

// ============================================================================
// Poll Policy
// ============================================================================

/// Interval schedule between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay after the first poll.
    pub initial_interval: Duration,
    /// Ceiling for the doubling interval.
    pub max_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
        }
    }
}

impl PollPolicy {
    /// Interval following `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_interval)
    }
}

// ============================================================================
// Deletion State
// ============================================================================

/// Where a deletion wait stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    /// Resource still visible (or a transient error occurred).
    Polling,
    /// Resource reported not-found.
    Confirmed,
    /// Deadline passed first.
    TimedOut,
    /// Cancellation fired first.
    Cancelled,
}

/// Result of a confirmed deletion wait.
#[derive(Debug, Clone, Copy)]
pub struct PollSummary {
    /// GET requests issued.
    pub polls: u32,
    /// Time from start to confirmation.
    pub elapsed: Duration,
}

// ============================================================================
// Deletion Poller
// ============================================================================

/// Polls one resource path until it disappears.
#[derive(Debug, Clone)]
pub struct DeletionPoller {
    executor: Arc<RequestExecutor>,
    path: String,
    policy: PollPolicy,
}

impl DeletionPoller {
    /// Creates a poller for the resource at `path`.
    pub fn new(executor: Arc<RequestExecutor>, path: impl Into<String>) -> Self {
        Self {
            executor,
            path: path.into(),
            policy: PollPolicy::default(),
        }
    }

    /// Sets the interval schedule.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Waits for deletion to be confirmed. `id` only labels errors and logs.
    #[instrument(skip(self, cancel), fields(path = %self.path))]
    pub async fn wait(
        &self,
        id: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<PollSummary, ClientError> {
        let started = Instant::now();
        let deadline = started.checked_add(timeout);
        let call = EndpointCall::get(self.path.clone());

        let mut interval = self.policy.initial_interval;
        let mut polls: u32 = 0;
        let mut state = DeletionState::Polling;

        while state == DeletionState::Polling {
            if cancel.is_cancelled() {
                state = DeletionState::Cancelled;
                break;
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                state = DeletionState::TimedOut;
                break;
            }

            polls += 1;
            state = tokio::select! {
                biased;
                () = cancel.cancelled() => DeletionState::Cancelled,
                () = sleep_until_deadline(deadline) => DeletionState::TimedOut,
                result = self.executor.send(&call) => match result {
                    Err(err) if err.is_not_found() => DeletionState::Confirmed,
                    Err(err) => {
                        warn!(poll = polls, error = %err, "Poll failed, will retry");
                        DeletionState::Polling
                    }
                    Ok(_) => {
                        debug!(poll = polls, "Resource still present");
                        DeletionState::Polling
                    }
                },
            };
            if state != DeletionState::Polling {
                break;
            }

            let pause = deadline.map_or(interval, |deadline| {
                interval.min(deadline.saturating_duration_since(Instant::now()))
            });
            state = tokio::select! {
                biased;
                () = cancel.cancelled() => DeletionState::Cancelled,
                () = tokio::time::sleep(pause) => DeletionState::Polling,
            };
            interval = self.policy.next_interval(interval);
        }

        let elapsed = started.elapsed();
        match state {
            DeletionState::Confirmed => {
                info!(polls, elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX), "Deletion confirmed");
                Ok(PollSummary { polls, elapsed })
            }
            DeletionState::Cancelled => Err(ClientError::Cancelled { id: id.to_string() }),
            DeletionState::TimedOut | DeletionState::Polling => Err(ClientError::DeleteTimeout {
                id: id.to_string(),
                timeout,
            }),
        }
    }
}

/// Sleeps until `deadline`, or forever when there is none.
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
