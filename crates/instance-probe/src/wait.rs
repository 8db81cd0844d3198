//! Waiting for an expectation to pass.
//!
//! [`wait_for_element`] re-runs a caller-supplied expectation until it
//! returns `Ok` or the timeout passes. The first attempt runs immediately;
//! between attempts the future sleeps on a [`Scheduler`], yielding to the
//! runtime instead of blocking.
//!
//! There is no cancellation token: a pending wait is a plain future, and
//! dropping it cancels it at its next sleep.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::WaitConfig;
use crate::result::{ProbeError, ProbeResult};

/// Shortest pause between attempts; keeps a zero interval from spinning
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Source of time and sleeping for the waiter
#[async_trait(?Send)]
pub trait Scheduler {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;

    /// Suspend for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Scheduler backed by tokio's timer
#[derive(Debug, Clone, Copy)]
pub struct TokioScheduler {
    origin: tokio::time::Instant,
}

impl TokioScheduler {
    /// Create a scheduler whose origin is now
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Lifecycle of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// Still polling
    Pending,
    /// Expectation passed
    Succeeded,
    /// Deadline passed with the expectation still failing
    TimedOut,
}

#[derive(Debug)]
struct WaitTask {
    config: WaitConfig,
    started: Duration,
    attempts: u32,
    state: WaitState,
}

impl WaitTask {
    fn new(config: WaitConfig, started: Duration) -> Self {
        Self {
            config,
            started,
            attempts: 0,
            state: WaitState::Pending,
        }
    }

    /// Pause before the next attempt, or `None` once the deadline is reached.
    ///
    /// The last pause is cut short so that a final attempt runs exactly at
    /// the deadline.
    fn next_delay(&self, elapsed: Duration) -> Option<Duration> {
        if elapsed >= self.config.timeout {
            return None;
        }
        let interval = self.config.interval.max(MIN_INTERVAL);
        Some(interval.min(self.config.timeout - elapsed))
    }
}

/// Poll `expectation` on `scheduler` until it passes or `config.timeout`
/// elapses.
///
/// Resolves with the expectation's value, or fails with
/// [`ProbeError::Timeout`] carrying the elapsed time and the last failure.
pub async fn wait_for_element_with<S, T, E, F>(
    scheduler: &S,
    config: &WaitConfig,
    mut expectation: F,
) -> ProbeResult<T>
where
    S: Scheduler + ?Sized,
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
{
    let mut task = WaitTask::new(*config, scheduler.now());
    loop {
        task.attempts += 1;
        let failure = match expectation() {
            Ok(value) => {
                task.state = WaitState::Succeeded;
                debug!(attempts = task.attempts, state = ?task.state, "wait finished");
                return Ok(value);
            }
            Err(err) => err.to_string(),
        };
        let elapsed = scheduler.now().saturating_sub(task.started);
        match task.next_delay(elapsed) {
            Some(delay) => {
                trace!(attempt = task.attempts, ?delay, %failure, "expectation failed, retrying");
                scheduler.sleep(delay).await;
            }
            None => {
                task.state = WaitState::TimedOut;
                debug!(attempts = task.attempts, state = ?task.state, %failure, "wait finished");
                return Err(ProbeError::Timeout {
                    elapsed_ms: elapsed.as_millis() as u64,
                    last_failure: failure,
                });
            }
        }
    }
}

/// Poll `expectation` on tokio's timer.
///
/// `timeout` and `interval` fall back to [`WaitConfig::from_env`].
pub async fn wait_for_element<T, E, F>(
    expectation: F,
    timeout: Option<Duration>,
    interval: Option<Duration>,
) -> ProbeResult<T>
where
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
{
    let mut config = WaitConfig::from_env();
    if let Some(timeout) = timeout {
        config.timeout = timeout;
    }
    if let Some(interval) = interval {
        config.interval = interval;
    }
    wait_for_element_with(&TokioScheduler::new(), &config, expectation).await
}

/// Yield once so work queued by an event handler can run
pub async fn flush_microtasks() {
    tokio::task::yield_now().await;
}
