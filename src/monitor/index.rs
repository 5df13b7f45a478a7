/*!
 * Index Set
 * One record arena with three coordinated views
 *
 * - Recency queue: insertion order, drives eviction
 * - Pid map: newest running record per pid, older ones chained via `shadowed`
 * - Start-time index: ordered by (started_at, id) for range queries
 *
 * Every structural change touches the arena and all three views together.
 */

use super::record::Record;
use crate::core::types::{Pid, RecordId, Timestamp};
use ahash::AHashMap;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, TryReserveError, VecDeque};
use std::ops::{Bound, RangeBounds};

pub(crate) struct IndexSet {
    arena: AHashMap<RecordId, Record>,
    recency: VecDeque<RecordId>,
    by_pid: AHashMap<Pid, RecordId>,
    by_start: BTreeSet<(Timestamp, RecordId)>,
    next_id: RecordId,
}

impl IndexSet {
    /// Create an index set pre-sized for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: AHashMap::with_capacity(capacity),
            recency: VecDeque::with_capacity(capacity),
            by_pid: AHashMap::with_capacity(capacity),
            by_start: BTreeSet::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.recency.len()
    }

    #[inline]
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.recency.is_empty()
    }

    /// Make room for one more record without reallocating inside `insert`
    pub fn try_reserve_one(&mut self) -> Result<(), TryReserveError> {
        self.recency.try_reserve(1)?;
        self.arena.try_reserve(1)?;
        self.by_pid.try_reserve(1)
    }

    /// Insert a new running record into all views, returning its id
    pub fn insert(&mut self, mut record: Record) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;

        record.id = id;
        record.shadowed = match self.by_pid.entry(record.pid) {
            Entry::Occupied(mut head) => Some(head.insert(id)),
            Entry::Vacant(slot) => {
                slot.insert(id);
                None
            }
        };

        self.recency.push_back(id);
        self.by_start.insert((record.started_at, id));
        self.arena.insert(id, record);
        id
    }

    /// Remove the oldest record from every view
    pub fn evict_oldest(&mut self) -> Option<Record> {
        let id = self.recency.pop_front()?;
        let record = self.arena.remove(&id)?;
        self.by_start.remove(&(record.started_at, id));
        if record.is_running() {
            self.unlink_running(&record);
        }
        Some(record)
    }

    /// Drop `record` from its pid chain; it may sit anywhere in the chain
    fn unlink_running(&mut self, record: &Record) {
        let Some(&head) = self.by_pid.get(&record.pid) else {
            return;
        };

        if head == record.id {
            match record.shadowed {
                Some(next) => {
                    self.by_pid.insert(record.pid, next);
                }
                None => {
                    self.by_pid.remove(&record.pid);
                }
            }
            return;
        }

        let mut cursor = head;
        while let Some(newer) = self.arena.get_mut(&cursor) {
            match newer.shadowed {
                Some(older) if older == record.id => {
                    newer.shadowed = record.shadowed;
                    return;
                }
                Some(older) => cursor = older,
                None => return,
            }
        }
    }

    /// Newest running record for `pid`
    pub fn find_running(&self, pid: Pid) -> Option<&Record> {
        self.by_pid.get(&pid).and_then(|id| self.arena.get(id))
    }

    /// Detach the newest running record for `pid` from the pid map
    ///
    /// The record stays in the arena and the other views; the caller is
    /// expected to mark it exited before releasing the lock.
    pub fn retire_running(&mut self, pid: Pid) -> Option<&mut Record> {
        let id = *self.by_pid.get(&pid)?;
        let shadowed = self.arena.get(&id)?.shadowed;

        match shadowed {
            Some(next) => {
                self.by_pid.insert(pid, next);
            }
            None => {
                self.by_pid.remove(&pid);
            }
        }

        let record = self.arena.get_mut(&id)?;
        record.shadowed = None;
        Some(record)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.arena.get(&id)
    }

    /// Records oldest first
    pub fn iter_recency(&self) -> impl Iterator<Item = &Record> + '_ {
        self.recency.iter().filter_map(|id| self.arena.get(id))
    }

    /// The `n` most recently inserted records, oldest first
    pub fn iter_recent(&self, n: usize) -> impl Iterator<Item = &Record> + '_ {
        let skip = self.recency.len().saturating_sub(n);
        self.recency
            .iter()
            .skip(skip)
            .filter_map(|id| self.arena.get(id))
    }

    /// Records whose start time falls in `range`, in start-time order
    pub fn range_by_start<R>(&self, range: R) -> impl Iterator<Item = &Record> + '_
    where
        R: RangeBounds<Timestamp>,
    {
        let lower = match range.start_bound() {
            Bound::Included(&t) => Bound::Included((t, RecordId::MIN)),
            Bound::Excluded(&t) => Bound::Excluded((t, RecordId::MAX)),
            Bound::Unbounded => Bound::Unbounded,
        };
        let upper = match range.end_bound() {
            Bound::Included(&t) => Bound::Included((t, RecordId::MAX)),
            Bound::Excluded(&t) => Bound::Excluded((t, RecordId::MIN)),
            Bound::Unbounded => Bound::Unbounded,
        };
        // BTreeSet::range panics on inverted bounds
        let valid = match (&lower, &upper) {
            (Bound::Excluded(a), Bound::Excluded(b)) => a < b,
            (Bound::Included(a) | Bound::Excluded(a), Bound::Included(b) | Bound::Excluded(b)) => {
                a <= b
            }
            _ => true,
        };
        valid
            .then(|| self.by_start.range((lower, upper)))
            .into_iter()
            .flatten()
            .filter_map(|(_, id)| self.arena.get(id))
    }

    /// Remove every record from every view
    pub fn clear(&mut self) {
        self.arena.clear();
        self.recency.clear();
        self.by_pid.clear();
        self.by_start.clear();
    }

    /// Verify that the arena and all three views describe the same records
    pub fn is_consistent(&self) -> bool {
        if self.arena.len() != self.recency.len() || self.arena.len() != self.by_start.len() {
            return false;
        }

        let mut previous = 0;
        for id in &self.recency {
            if *id <= previous || !self.arena.contains_key(id) {
                return false;
            }
            previous = *id;
        }

        for (started_at, id) in &self.by_start {
            match self.arena.get(id) {
                Some(record) if record.started_at == *started_at => {}
                _ => return false,
            }
        }

        let mut chained = 0;
        for (pid, head) in &self.by_pid {
            let mut cursor = Some(*head);
            while let Some(id) = cursor {
                match self.arena.get(&id) {
                    Some(record) if record.pid == *pid && record.is_running() => {
                        chained += 1;
                        cursor = record.shadowed;
                    }
                    _ => return false,
                }
                if chained > self.arena.len() {
                    return false;
                }
            }
        }

        let running = self.arena.values().filter(|r| r.is_running()).count();
        chained == running
    }
}
