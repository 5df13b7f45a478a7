/*!
 * Monitor Controller
 * Runtime control over recording, clearing and statistics
 */

use super::store::ProcessStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Control operations accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCommand {
    Start,
    Stop,
    Clear,
    ResetStatistics,
}

/// Current controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
    pub monitoring_enabled: bool,
    pub records: usize,
    pub capacity: usize,
}

/// Toggles recording and clears the store; every command is idempotent
#[derive(Clone)]
pub struct MonitorController {
    store: Arc<ProcessStore>,
}

impl MonitorController {
    pub fn new(store: Arc<ProcessStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ProcessStore> {
        &self.store
    }

    /// Resume recording new events
    pub fn start(&self) {
        self.store.set_monitoring(true);
        info!("monitoring started");
    }

    /// Stop recording; events arriving while stopped are lost
    pub fn stop(&self) {
        self.store.set_monitoring(false);
        info!("monitoring stopped");
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn reset_statistics(&self) {
        self.store.reset_statistics();
    }

    pub fn is_monitoring(&self) -> bool {
        self.store.is_monitoring()
    }

    pub fn status(&self) -> ControlStatus {
        ControlStatus {
            monitoring_enabled: self.store.is_monitoring(),
            records: self.store.len(),
            capacity: self.store.capacity(),
        }
    }

    pub fn apply(&self, command: ControlCommand) {
        match command {
            ControlCommand::Start => self.start(),
            ControlCommand::Stop => self.stop(),
            ControlCommand::Clear => self.clear(),
            ControlCommand::ResetStatistics => self.reset_statistics(),
        }
    }
}
