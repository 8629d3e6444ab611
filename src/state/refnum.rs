//! Correlation-id generation for solicited operations.

use std::sync::atomic::{AtomicI32, Ordering};

/// Start above zero so a zeroed `ReferenceNumber` register never matches a
/// live registration.
const REFNUM_START: i32 = 1;

/// Produces process-unique, strictly increasing correlation ids.
///
/// The dispatcher runs on the transport's thread while operations start on
/// application threads, so allocation must be safe under concurrent
/// invocation. Wraparound after `i32::MAX` allocations is an accepted
/// theoretical non-goal.
pub struct ReferenceAllocator {
    counter: AtomicI32,
}

impl ReferenceAllocator {
    /// Create a fresh allocator.
    pub fn new() -> Self {
        Self {
            counter: AtomicI32::new(REFNUM_START),
        }
    }

    /// Allocate the next correlation id.
    pub fn next(&self) -> i32 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ReferenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}
