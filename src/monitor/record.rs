/*!
 * Process Records
 * Identity and lifecycle state of one observed process
 */

use crate::core::data_structures::CommName;
use crate::core::types::{ExitCode, Pid, RecordId, Timestamp, NANOS_PER_SEC};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle status of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Running,
    Exited,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Exited => "EXITED",
        }
    }
}

/// Resource usage reported with an exit event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    /// Consumed CPU time in nanoseconds
    pub cpu_time_ns: u64,
    /// Peak resident memory in bytes
    pub memory_bytes: u64,
}

/// One tracked process
///
/// Owned exclusively by the store. Callers only ever see [`RecordView`] copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Record {
    pub id: RecordId,
    pub pid: Pid,
    pub parent_pid: Pid,
    pub name: CommName,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub status: ProcessStatus,
    pub exit_code: ExitCode,
    pub usage: ResourceUsage,
    /// Statistics epoch the record was counted in
    pub epoch: u64,
    /// Older running record with the same pid, hidden behind this one
    pub shadowed: Option<RecordId>,
}

impl Record {
    pub fn new(pid: Pid, parent_pid: Pid, name: CommName, started_at: Timestamp) -> Self {
        Self {
            id: 0,
            pid,
            parent_pid,
            name,
            started_at,
            ended_at: None,
            status: ProcessStatus::Running,
            exit_code: 0,
            usage: ResourceUsage::default(),
            epoch: 0,
            shadowed: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == ProcessStatus::Running
    }

    /// Retire a running record, returning its lifetime in nanoseconds
    ///
    /// Returns `None` if the record has already exited; the transition
    /// happens at most once.
    pub fn mark_exited(
        &mut self,
        at: Timestamp,
        exit_code: ExitCode,
        usage: ResourceUsage,
    ) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        let ended_at = at.max(self.started_at);
        self.ended_at = Some(ended_at);
        self.status = ProcessStatus::Exited;
        self.exit_code = exit_code;
        self.usage = usage;
        Some(ended_at - self.started_at)
    }

    /// Lifetime in nanoseconds, only for exited records
    #[inline]
    pub fn lifetime_ns(&self) -> Option<u64> {
        self.ended_at.map(|end| end - self.started_at)
    }

    pub fn view(&self) -> RecordView {
        RecordView {
            id: self.id,
            pid: self.pid,
            parent_pid: self.parent_pid,
            name: self.name.clone(),
            started_at: self.started_at,
            ended_at: self.ended_at,
            status: self.status,
            exit_code: self.exit_code,
            usage: self.usage,
        }
    }
}

/// Point-in-time copy of a record returned by queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    pub id: RecordId,
    pub pid: Pid,
    pub parent_pid: Pid,
    pub name: CommName,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub status: ProcessStatus,
    pub exit_code: ExitCode,
    pub usage: ResourceUsage,
}

impl RecordView {
    #[inline]
    pub fn is_running(&self) -> bool {
        self.status == ProcessStatus::Running
    }

    /// Lifetime of an exited process
    pub fn lifetime(&self) -> Option<Duration> {
        self.ended_at
            .map(|end| Duration::from_nanos(end - self.started_at))
    }

    /// Lifetime in whole seconds, zero while running
    pub fn lifetime_secs(&self) -> u64 {
        self.ended_at
            .map(|end| (end - self.started_at) / NANOS_PER_SEC)
            .unwrap_or(0)
    }
}
