/*!
 * Control and Query Front-End
 *
 * Turns text commands into controller, filter and store calls and renders
 * the results as text reports. Event simulation commands go through an
 * [`EventSink`], the same seam a live event source uses.
 */

pub mod command;
pub mod report;

pub use command::Command;
pub use report::{ControlReport, FilterReport, ProcessTable, StatsReport, HELP};

use crate::core::errors::CommandError;
use crate::monitor::{EventSink, FilterManager, MonitorController, ProcessStore, ResourceUsage};
use std::sync::Arc;
use tracing::debug;

/// Outcome of one executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// Command dispatcher bound to one store
pub struct Frontend {
    controller: MonitorController,
    sink: Arc<dyn EventSink>,
    list_limit: usize,
}

impl Frontend {
    /// Dispatcher feeding simulated events straight into the store
    pub fn new(controller: MonitorController, list_limit: usize) -> Self {
        let sink: Arc<dyn EventSink> = controller.store().clone();
        Self {
            controller,
            sink,
            list_limit: list_limit.max(1),
        }
    }

    /// Route simulated events through another sink, such as a channel source
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    fn store(&self) -> &ProcessStore {
        self.controller.store()
    }

    fn filter(&self) -> &FilterManager {
        self.store().filter()
    }

    /// Parse and execute one input line
    pub fn execute_line(&self, line: &str) -> Result<Reply, CommandError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    pub fn execute(&self, command: Command) -> Result<Reply, CommandError> {
        let name = command.name();
        debug!(command = name, "executing command");

        let reply = match command {
            Command::Control(control) => {
                self.controller.apply(control);
                Reply::text(format!("{name} ok"))
            }

            Command::EnableFilter => {
                self.filter().enable();
                Reply::text("filter enabled")
            }
            Command::DisableFilter => {
                self.filter().disable();
                Reply::text("filter disabled")
            }
            Command::ResetFilter => {
                self.filter().reset();
                Reply::text("filter reset")
            }
            Command::SetFilter { field, value } => {
                self.filter().set(field, &value)?;
                Reply::text(format!("filter {field} set"))
            }

            Command::Stats => Reply::text(StatsReport(&self.store().snapshot()).to_string()),
            Command::Processes(limit) => {
                let result = self.store().list(limit.unwrap_or(self.list_limit));
                Reply::text(ProcessTable::new(&result).to_string())
            }
            Command::Recent(n) => {
                let result = self.store().list_recent(n);
                Reply::text(ProcessTable::titled("Recent Process Records", &result).to_string())
            }
            Command::ShowFilter => Reply::text(FilterReport(&self.filter().current()).to_string()),
            Command::ShowControl => {
                Reply::text(ControlReport(&self.controller.status()).to_string())
            }
            Command::Json(limit) => {
                let result = self.store().list(limit.unwrap_or(self.list_limit));
                Reply::text(serde_json::to_string_pretty(&result)?)
            }

            Command::Fork {
                pid,
                parent_pid,
                name,
            } => {
                self.sink.notify_start(pid, parent_pid, &name);
                Reply::text(format!("fork {pid} sent"))
            }
            Command::Exit { pid, exit_code } => {
                self.sink
                    .notify_exit(pid, exit_code, ResourceUsage::default());
                Reply::text(format!("exit {pid} sent"))
            }

            Command::Help => Reply::text(HELP),
            Command::Quit => Reply::Quit,
        };
        Ok(reply)
    }
}
