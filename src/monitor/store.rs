/*!
 * Process Store
 * Bounded record store fed by the event source
 *
 * Index set, statistics and the statistics epoch share one spin lock.
 * The filter configuration has its own lock and is never taken while the
 * spin lock is held.
 */

use super::filter::{FilterConfig, FilterManager};
use super::index::IndexSet;
use super::record::{Record, RecordView, ResourceUsage};
use super::stats::{Statistics, StatisticsView};
use crate::core::clock::{Clock, MonotonicClock};
use crate::core::data_structures::CommName;
use crate::core::errors::MonitorError;
use crate::core::limits::{DEFAULT_LIST_LIMIT, MAX_PROCESS_RECORDS};
use crate::core::sync::SpinLock;
use crate::core::types::{ExitCode, Pid, RecordId, Timestamp, NANOS_PER_SEC};
use serde::{Deserialize, Serialize};
use std::ops::RangeBounds;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

struct StoreInner {
    index: IndexSet,
    stats: Statistics,
    /// Bumped by every statistics reset
    epoch: u64,
}

/// Result of a filtered listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub records: Vec<RecordView>,
    /// More matching records exist beyond the returned ones
    pub truncated: bool,
    pub total_matched: usize,
}

/// Bounded, multiply indexed process record store
pub struct ProcessStore {
    inner: SpinLock<StoreInner>,
    capacity: usize,
    clock: Arc<dyn Clock>,
    filter: Arc<FilterManager>,
    monitoring: AtomicBool,
    origin: Timestamp,
}

impl ProcessStore {
    /// Store with default capacity, monotonic clock and an empty filter
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shared filter configuration consulted by listings and log lines
    pub fn filter(&self) -> &Arc<FilterManager> {
        &self.filter
    }

    #[inline]
    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::Acquire)
    }

    /// Gate whether start and exit events have any effect
    ///
    /// The flag flips under the store lock, so once this returns no event
    /// that saw the old value is still committing.
    pub fn set_monitoring(&self, enabled: bool) {
        let _guard = self.inner.lock();
        self.monitoring.store(enabled, Ordering::Release);
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record a process creation
    ///
    /// Evicts the oldest record when the store is full. Returns `None` when
    /// monitoring is stopped or the record could not be allocated; the event
    /// is dropped in both cases.
    pub fn record_start(&self, pid: Pid, parent_pid: Pid, name: &str) -> Option<RecordId> {
        if !self.is_monitoring() {
            return None;
        }

        let mut record = Record::new(pid, parent_pid, CommName::new(name), 0);

        let view = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            // Re-checked under the lock so nothing commits after a stop returns
            if !self.is_monitoring() {
                return None;
            }

            let evicted = if inner.index.len() >= self.capacity {
                inner.index.evict_oldest()
            } else {
                None
            };

            if let Err(e) = inner.index.try_reserve_one() {
                drop(guard);
                let err = MonitorError::AllocationFailed(e.to_string());
                warn!(pid, error = %err, "process record not stored, event dropped");
                return None;
            }

            record.started_at = self.clock.now();
            record.epoch = inner.epoch;
            let id = inner.index.insert(record);
            inner.stats.on_created();

            let view = inner.index.get(id).map(Record::view);
            drop(guard);

            if let Some(old) = evicted {
                debug!(pid = old.pid, id = old.id, "evicted oldest record");
            }
            view?
        };

        if self.filter.matches(&view) {
            info!(pid, ppid = parent_pid, comm = %view.name, "process created");
        }
        Some(view.id)
    }

    /// Record a process exit without resource usage
    pub fn record_exit(&self, pid: Pid, exit_code: ExitCode) {
        self.record_exit_with_usage(pid, exit_code, ResourceUsage::default());
    }

    /// Retire the newest running record for `pid`
    ///
    /// A pid with no running record is ignored: its start was never recorded,
    /// was evicted, or has been cleared.
    pub fn record_exit_with_usage(&self, pid: Pid, exit_code: ExitCode, usage: ResourceUsage) {
        if !self.is_monitoring() {
            return;
        }

        let retired = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if !self.is_monitoring() {
                return;
            }
            let now = self.clock.now();

            let retired = match inner.index.retire_running(pid) {
                Some(record) => {
                    let counted = record.epoch == inner.epoch;
                    record
                        .mark_exited(now, exit_code, usage)
                        .map(|lifetime| (lifetime, counted, record.view()))
                }
                None => None,
            };

            if let Some((lifetime, true, _)) = &retired {
                inner.stats.on_exited(*lifetime, usage);
            }
            retired
        };

        let Some((lifetime, _, view)) = retired else {
            trace!(pid, "exit for untracked pid ignored");
            return;
        };

        if self.filter.matches(&view) {
            info!(
                pid,
                exit_code,
                lifetime_secs = lifetime / NANOS_PER_SEC,
                "process exited"
            );
        }
    }

    /// Consistent copy of the statistics
    pub fn snapshot(&self) -> StatisticsView {
        let (stats, records_in_memory, now) = {
            let inner = self.inner.lock();
            (inner.stats, inner.index.len(), self.clock.now())
        };

        StatisticsView {
            stats,
            records_in_memory,
            capacity: self.capacity,
            monitoring_enabled: self.is_monitoring(),
            uptime: Duration::from_nanos(now.saturating_sub(self.origin)),
        }
    }

    /// Oldest-first listing of records passing the active filter
    pub fn list(&self, limit: usize) -> ListResult {
        let filter = self.filter.current();
        let mut records = Vec::with_capacity(limit.min(self.capacity));

        let total_matched = {
            let inner = self.inner.lock();
            collect_matching(inner.index.iter_recency(), &filter, limit, &mut records)
        };

        ListResult {
            truncated: total_matched > records.len(),
            records,
            total_matched,
        }
    }

    /// Listing capped at the default limit of 50
    pub fn list_default(&self) -> ListResult {
        self.list(DEFAULT_LIST_LIMIT)
    }

    /// The `n` most recent records passing the active filter, oldest first
    pub fn list_recent(&self, n: usize) -> ListResult {
        let filter = self.filter.current();
        let mut records = Vec::with_capacity(n.min(self.capacity));

        let total_matched = {
            let inner = self.inner.lock();
            collect_matching(inner.index.iter_recent(n), &filter, n, &mut records)
        };

        ListResult {
            truncated: total_matched > records.len(),
            records,
            total_matched,
        }
    }

    /// Records started within `range`, in start-time order
    pub fn list_by_start_time<R>(&self, range: R, limit: usize) -> ListResult
    where
        R: RangeBounds<Timestamp>,
    {
        let filter = self.filter.current();
        let mut records = Vec::with_capacity(limit.min(self.capacity));

        let total_matched = {
            let inner = self.inner.lock();
            collect_matching(inner.index.range_by_start(range), &filter, limit, &mut records)
        };

        ListResult {
            truncated: total_matched > records.len(),
            records,
            total_matched,
        }
    }

    /// Newest running record for `pid`, ignoring the filter
    pub fn lookup(&self, pid: Pid) -> Option<RecordView> {
        self.inner.lock().index.find_running(pid).map(Record::view)
    }

    /// Drop every record; statistics are kept
    pub fn clear(&self) {
        let dropped = {
            let mut inner = self.inner.lock();
            let dropped = inner.index.len();
            inner.index.clear();
            dropped
        };
        info!(dropped, "all records cleared");
    }

    /// Zero the statistics; records are kept
    ///
    /// Records inserted before the reset still retire normally but their
    /// exits are not counted.
    pub fn reset_statistics(&self) {
        {
            let mut inner = self.inner.lock();
            inner.stats.reset();
            inner.epoch += 1;
        }
        info!("statistics reset");
    }

    /// Check that all three views agree with the arena
    pub fn is_consistent(&self) -> bool {
        self.inner.lock().index.is_consistent()
    }

    /// Release every record and log the final counters
    pub fn shutdown(&self) {
        let stats = {
            let mut inner = self.inner.lock();
            inner.index.clear();
            inner.stats
        };
        info!(
            created = stats.created,
            exited = stats.exited,
            "process store shut down"
        );
    }
}

impl Default for ProcessStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Push copies of matching records into `out` up to `limit`, counting all matches
fn collect_matching<'a, I>(
    records: I,
    filter: &FilterConfig,
    limit: usize,
    out: &mut Vec<RecordView>,
) -> usize
where
    I: Iterator<Item = &'a Record>,
{
    let mut matched = 0;
    for record in records.filter(|r| filter.matches(*r)) {
        if out.len() < limit {
            out.push(record.view());
        }
        matched += 1;
    }
    matched
}

/// Builder for ProcessStore
pub struct StoreBuilder {
    capacity: usize,
    clock: Option<Arc<dyn Clock>>,
    filter: Option<Arc<FilterManager>>,
    monitoring: bool,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            capacity: MAX_PROCESS_RECORDS,
            clock: None,
            filter: None,
            monitoring: true,
        }
    }

    /// Maximum records kept before eviction, at least one
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Share a filter configuration with other components
    pub fn with_filter(mut self, filter: Arc<FilterManager>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Start with monitoring stopped
    pub fn paused(mut self) -> Self {
        self.monitoring = false;
        self
    }

    pub fn build(self) -> ProcessStore {
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let origin = clock.now();

        info!(capacity = self.capacity, "process store initialized");

        ProcessStore {
            inner: SpinLock::new(StoreInner {
                index: IndexSet::with_capacity(self.capacity),
                stats: Statistics::default(),
                epoch: 0,
            }),
            capacity: self.capacity,
            clock,
            filter: self.filter.unwrap_or_default(),
            monitoring: AtomicBool::new(self.monitoring),
            origin,
        }
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
