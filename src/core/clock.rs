/*!
 * Monotonic Clock
 * Time source for record timestamps
 */

use super::types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic timestamps
///
/// Implementations must never go backwards, since record lifetimes are
/// computed as `ended_at - started_at`.
pub trait Clock: Send + Sync {
    /// Nanoseconds elapsed since the clock's origin
    fn now(&self) -> Timestamp;
}

/// Wall-independent clock anchored at construction time
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Timestamp {
        // u64 nanoseconds covers ~584 years of uptime
        self.origin.elapsed().as_nanos() as Timestamp
    }
}

/// Manually driven clock for deterministic tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ns: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.now_ns
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute timestamp, ignored if it would go backwards
    pub fn set(&self, at: Timestamp) {
        self.now_ns.fetch_max(at, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Timestamp {
        self.now_ns.load(Ordering::SeqCst)
    }
}
