//! Virtual clock for deterministic waits.
//!
//! Time only moves when someone sleeps on the clock or fast-forwards it, so
//! `wait_for_element` can be tested without real delays.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::wait::Scheduler;

/// Clock whose time advances only on demand
#[derive(Debug, Default)]
pub struct VirtualClock {
    /// Current time in milliseconds since creation
    current_ms: AtomicU64,
    /// Number of sleeps requested
    sleeps: AtomicU64,
}

impl VirtualClock {
    /// Create a clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }

    /// Move time forward
    pub fn fast_forward(&self, duration: Duration) {
        self.fast_forward_ms(duration.as_millis() as u64);
    }

    /// Move time forward by milliseconds
    pub fn fast_forward_ms(&self, ms: u64) {
        self.current_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// How many times `sleep` was called
    #[must_use]
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait(?Send)]
impl Scheduler for VirtualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms())
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.fast_forward(duration);
        tokio::task::yield_now().await;
    }
}
