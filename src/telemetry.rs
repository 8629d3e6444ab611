//! Telemetry utilities for operation timing and tracing spans.

use std::time::Instant;
use tracing::debug;

/// Guard for timing a session operation.
///
/// Logs the operation latency when dropped, whether the operation resolved
/// or failed.
pub struct OpTimer {
    operation: &'static str,
    start: Instant,
}

impl OpTimer {
    /// Start timing an operation.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for OpTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        debug!(operation = self.operation, ?elapsed, "operation finished");
    }
}

/// Standardized span constructors for session observability.
pub mod spans {
    use tracing::{info_span, Span};

    /// Create a span for one session's lifetime.
    pub fn session(universe: &str) -> Span {
        info_span!("session", universe = %universe)
    }

    /// Create a span for one dispatched native notification.
    pub fn dispatch(slot: &str, reference: Option<i32>) -> Span {
        if let Some(reference) = reference {
            info_span!("dispatch", slot = %slot, reference)
        } else {
            info_span!("dispatch", slot = %slot)
        }
    }
}
