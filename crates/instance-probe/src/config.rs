//! Configuration for rendering and waiting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::element::Element;

/// Default timeout for `wait_for_element` (4.5 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 4500;

/// Default polling interval for `wait_for_element` (50ms)
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 50;

/// Environment variable overriding the wait timeout
pub const WAIT_TIMEOUT_ENV: &str = "INSTANCE_PROBE_WAIT_TIMEOUT_MS";

/// Environment variable overriding the wait interval
pub const WAIT_INTERVAL_ENV: &str = "INSTANCE_PROBE_WAIT_INTERVAL_MS";

/// Timing for `wait_for_element`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Total time allowed before failing
    pub timeout: Duration,
    /// Pause between attempts
    pub interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_WAIT_INTERVAL_MS),
        }
    }
}

impl WaitConfig {
    /// Create a config with default timing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `INSTANCE_PROBE_WAIT_TIMEOUT_MS` and
    /// `INSTANCE_PROBE_WAIT_INTERVAL_MS` when set to valid integers
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let mut config = Self::default();
        if let Some(ms) = read(WAIT_TIMEOUT_ENV) {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = read(WAIT_INTERVAL_ENV) {
            config.interval = Duration::from_millis(ms);
        }
        config
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Timeout in milliseconds
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

type NodeMockFn = dyn Fn(&Element) -> Value;

/// Options for `render`
#[derive(Clone, Default)]
pub struct RenderOptions {
    create_node_mock: Option<Rc<NodeMockFn>>,
}

impl RenderOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply mock instances (e.g. refs) for host elements
    #[must_use]
    pub fn with_create_node_mock(mut self, f: impl Fn(&Element) -> Value + 'static) -> Self {
        self.create_node_mock = Some(Rc::new(f));
        self
    }

    /// Mock instance for a host element, if a factory is set
    #[must_use]
    pub fn create_node_mock(&self, element: &Element) -> Option<Value> {
        self.create_node_mock.as_ref().map(|f| f(element))
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("create_node_mock", &self.create_node_mock.is_some())
            .finish()
    }
}
