/*!
 * Process Monitor
 * Bounded store of process lifecycle records with statistics and filtering
 */

mod controller;
mod filter;
mod index;
mod record;
mod source;
mod stats;
mod store;
mod tracer;

pub use controller::{ControlCommand, ControlStatus, MonitorController};
pub use filter::{matches, FilterConfig, FilterField, FilterManager, Filterable};
pub use record::{ProcessStatus, RecordView, ResourceUsage};
pub use source::{ChannelSource, EventSender, EventSink, ProcessEvent};
pub use stats::{Statistics, StatisticsView};
pub use store::{ListResult, ProcessStore, StoreBuilder};
pub use tracer::init_tracing;
