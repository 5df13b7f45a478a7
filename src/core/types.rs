/*!
 * Core Types
 * Common types used across the monitor
 */

/// Process ID type
pub type Pid = u32;

/// Process exit status as reported by the event source
pub type ExitCode = i32;

/// Timestamp in nanoseconds since the store clock's origin
pub type Timestamp = u64;

/// Stable handle of a record inside the store arena
///
/// Assigned monotonically at insert and never reused within one store.
pub type RecordId = u64;

/// Common result type for monitor operations
pub type MonitorResult<T> = Result<T, super::errors::MonitorError>;

/// Nanoseconds per second, used for lifetime conversions
pub const NANOS_PER_SEC: u64 = 1_000_000_000;
