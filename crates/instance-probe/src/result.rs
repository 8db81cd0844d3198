//! Result and error types for instance-probe.

use thiserror::Error;

/// Result type for instance-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Error raised by an event handler prop.
///
/// Handlers return this to signal failure; `fire_event` hands it back to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    /// Error message
    pub message: String,
}

impl HandlerError {
    /// Create a new handler error
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur in instance-probe
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A query required at least one match and found none
    #[error("No instances found with {criterion}")]
    NotFound {
        /// Criterion kind and value, e.g. `testID "submit"`
        criterion: String,
    },

    /// A singular query matched more than one node
    #[error("Expected 1 but found {count} instances with {criterion}")]
    MultipleMatches {
        /// Criterion kind and value
        criterion: String,
        /// Number of matching nodes
        count: usize,
    },

    /// `wait_for_element` ran out of time
    #[error("Timed out after {elapsed_ms}ms waiting for element: {last_failure}")]
    Timeout {
        /// Time spent waiting in milliseconds
        elapsed_ms: u64,
        /// Failure reported by the last attempt
        last_failure: String,
    },

    /// An event handler failed
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// The render has been unmounted and has no root
    #[error("Cannot query an unmounted render")]
    Unmounted,

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Check if this is a `NotFound` error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a `MultipleMatches` error
    #[must_use]
    pub const fn is_multiple_matches(&self) -> bool {
        matches!(self, Self::MultipleMatches { .. })
    }

    /// Check if this is a `Timeout` error
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_criterion() {
        let err = ProbeError::NotFound {
            criterion: "testID \"submit\"".to_string(),
        };
        assert_eq!(err.to_string(), "No instances found with testID \"submit\"");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_multiple_matches_message() {
        let err = ProbeError::MultipleMatches {
            criterion: "type View".to_string(),
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Expected 1 but found 3 instances with type View"
        );
        assert!(err.is_multiple_matches());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_timeout_carries_last_failure() {
        let err = ProbeError::Timeout {
            elapsed_ms: 50,
            last_failure: "not ready".to_string(),
        };
        assert!(err.to_string().contains("50ms"));
        assert!(err.to_string().contains("not ready"));
        assert!(err.is_timeout());
    }

    #[test]
    fn test_handler_error_is_transparent() {
        let err: ProbeError = HandlerError::new("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
