/*!
 * Statistics Aggregator
 * Historical counters updated at insert and exit, never by scanning
 */

use super::record::ResourceUsage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Running process counters and lifetime extrema
///
/// Lifetimes are kept in nanoseconds. Min, max and average are zero until the
/// first exit is counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub created: u64,
    pub exited: u64,
    pub current: u64,
    pub peak: u64,
    pub total_cpu_time_ns: u64,
    pub total_lifetime_ns: u64,
    pub avg_lifetime_ns: u64,
    pub min_lifetime_ns: u64,
    pub max_lifetime_ns: u64,
}

impl Statistics {
    /// Account for a newly recorded process
    #[inline]
    pub(crate) fn on_created(&mut self) {
        self.created += 1;
        self.current += 1;
        self.peak = self.peak.max(self.current);
    }

    /// Account for a retired process
    pub(crate) fn on_exited(&mut self, lifetime_ns: u64, usage: ResourceUsage) {
        self.exited += 1;
        self.current = self.current.saturating_sub(1);
        self.total_cpu_time_ns = self.total_cpu_time_ns.saturating_add(usage.cpu_time_ns);
        self.total_lifetime_ns = self.total_lifetime_ns.saturating_add(lifetime_ns);

        if self.exited == 1 {
            self.min_lifetime_ns = lifetime_ns;
            self.max_lifetime_ns = lifetime_ns;
        } else {
            self.min_lifetime_ns = self.min_lifetime_ns.min(lifetime_ns);
            self.max_lifetime_ns = self.max_lifetime_ns.max(lifetime_ns);
        }

        // avg' = (avg * (n - 1) + lifetime) / n, widened so the product cannot overflow
        let n = self.exited as u128;
        let weighted = self.avg_lifetime_ns as u128 * (n - 1) + lifetime_ns as u128;
        self.avg_lifetime_ns = (weighted / n) as u64;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn avg_lifetime(&self) -> Duration {
        Duration::from_nanos(self.avg_lifetime_ns)
    }

    pub fn min_lifetime(&self) -> Duration {
        Duration::from_nanos(self.min_lifetime_ns)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_nanos(self.max_lifetime_ns)
    }

    pub fn total_cpu_time(&self) -> Duration {
        Duration::from_nanos(self.total_cpu_time_ns)
    }
}

/// Snapshot of the statistics plus store occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsView {
    pub stats: Statistics,
    pub records_in_memory: usize,
    pub capacity: usize,
    pub monitoring_enabled: bool,
    pub uptime: Duration,
}

impl StatisticsView {
    /// Exited processes per second of uptime
    ///
    /// `None` until at least one exit is counted and a full second has passed.
    pub fn turnover_rate(&self) -> Option<u64> {
        let uptime_secs = self.uptime.as_secs();
        if self.stats.exited == 0 || uptime_secs == 0 {
            return None;
        }
        Some(self.stats.exited / uptime_secs)
    }
}

impl std::ops::Deref for StatisticsView {
    type Target = Statistics;

    fn deref(&self) -> &Statistics {
        &self.stats
    }
}
