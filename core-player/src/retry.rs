//! # Typed Backoff Helper
//!
//! Replaces the ad hoc rescheduled-callback retries of the original player
//! with small, explicit helpers: [`retry`] for operations that fail with an
//! error, [`poll_until`] for queries that succeed but return an empty result
//! (the widget metadata case).

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// How many additional attempts to make, and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPlan {
    /// Additional attempts after the first one.
    pub times: u32,
    /// Delay before each additional attempt.
    pub delay: Duration,
}

impl RetryPlan {
    pub fn new(times: u32, delay: Duration) -> Self {
        Self { times, delay }
    }

    /// Total number of attempts including the first.
    pub fn total_attempts(&self) -> u32 {
        self.times + 1
    }
}

/// Run `op` up to `plan.total_attempts()` times, sleeping `plan.delay`
/// between attempts. Returns the first `Ok`, or the last error once the
/// ceiling is reached. The attempt index (0-based) is passed to `op`.
pub async fn retry<T, E, F, Fut>(plan: RetryPlan, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= plan.times => return Err(e),
            Err(_) => {
                attempt += 1;
                sleep(plan.delay).await;
            }
        }
    }
}

/// Run `op` up to `plan.total_attempts()` times until it yields `Some`,
/// sleeping `plan.delay` between attempts. Returns `None` once the ceiling
/// is reached. Errors from `op` count as empty results: the caller degrades
/// to a placeholder either way.
pub async fn poll_until<T, F, Fut>(plan: RetryPlan, mut op: F) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let mut attempt = 0;
    loop {
        if let Some(value) = op(attempt).await {
            return Some(value);
        }
        if attempt >= plan.times {
            return None;
        }
        attempt += 1;
        sleep(plan.delay).await;
    }
}
