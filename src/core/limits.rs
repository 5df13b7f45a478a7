/*!
 * System Limits and Constants
 *
 * Centralized location for monitor-wide limits and thresholds.
 */

// =============================================================================
// STORE LIMITS
// =============================================================================

/// Maximum number of records held in memory (1000)
/// The oldest record is evicted once this is reached
pub const MAX_PROCESS_RECORDS: usize = 1000;

/// Kernel command name buffer length, terminator included
/// [LINUX-COMPAT] TASK_COMM_LEN
pub const TASK_COMM_LEN: usize = 16;

/// Usable bytes of a command name
pub const COMM_CAPACITY: usize = TASK_COMM_LEN - 1;

// =============================================================================
// REPORTING LIMITS
// =============================================================================

/// Default cap on records returned by a filtered listing (50)
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Event source channel bound before producers start blocking
pub const EVENT_CHANNEL_CAPACITY: usize = 4096;
