/*!
 * Process Monitor Library
 * Bounded process lifecycle store with statistics, filtering and control
 */

pub mod config;
pub mod core;
pub mod frontend;
pub mod monitor;

// Re-exports
pub use config::MonitorConfig;
pub use crate::core::errors::{CommandError, FilterError, MonitorError};
pub use crate::core::types::{ExitCode, MonitorResult, Pid, RecordId, Timestamp};
pub use frontend::{Command, Frontend};
pub use monitor::{
    init_tracing, ChannelSource, ControlCommand, EventSink, FilterConfig, FilterField,
    FilterManager, ListResult, MonitorController, ProcessEvent, ProcessStatus, ProcessStore,
    RecordView, StatisticsView,
};
