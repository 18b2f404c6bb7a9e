//! Execution parameters — use case run control.
//!
//! [`ExecutionParams`] groups the static parameters that bound a single
//! consensus run. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound for one whole consensus run (fan-out plus synthesis)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Run control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Wall-clock limit for one consensus run.
    pub request_timeout: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Same as [`with_request_timeout`](Self::with_request_timeout), in whole seconds
    pub fn with_request_timeout_seconds(self, seconds: u64) -> Self {
        self.with_request_timeout(Duration::from_secs(seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default().with_request_timeout_seconds(5);
        assert_eq!(params.request_timeout, Duration::from_secs(5));
    }
}
