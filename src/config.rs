/*!
 * Monitor Configuration
 *
 * Runtime settings with environment overrides:
 * - PROCMON_CAPACITY: records kept before eviction (default 1000)
 * - PROCMON_LIST_LIMIT: default cap for process listings (default 50)
 * - PROCMON_TRACE_JSON: JSON log output (default false)
 */

use crate::core::errors::MonitorError;
use crate::core::limits::{DEFAULT_LIST_LIMIT, MAX_PROCESS_RECORDS};
use crate::core::types::MonitorResult;
use crate::monitor::{ProcessStore, StoreBuilder};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum records held in memory
    pub capacity: usize,
    /// Default number of records shown by a listing
    pub list_limit: usize,
    /// Emit logs as JSON
    pub trace_json: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_PROCESS_RECORDS,
            list_limit: DEFAULT_LIST_LIMIT,
            trace_json: false,
        }
    }
}

impl MonitorConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_list_limit(mut self, list_limit: usize) -> Self {
        self.list_limit = list_limit;
        self
    }

    pub fn with_trace_json(mut self, trace_json: bool) -> Self {
        self.trace_json = trace_json;
        self
    }

    /// Defaults overridden by PROCMON_* variables
    pub fn from_env() -> MonitorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> MonitorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PROCMON_CAPACITY") {
            config.capacity = parse_var("PROCMON_CAPACITY", &raw)?;
        }
        if let Some(raw) = lookup("PROCMON_LIST_LIMIT") {
            config.list_limit = parse_var("PROCMON_LIST_LIMIT", &raw)?;
        }
        if let Some(raw) = lookup("PROCMON_TRACE_JSON") {
            let raw = raw.trim();
            config.trace_json = raw == "1" || raw.eq_ignore_ascii_case("true");
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.capacity == 0 {
            return Err(MonitorError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.list_limit == 0 {
            return Err(MonitorError::InvalidConfig(
                "list limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Store builder preconfigured from these settings
    pub fn store_builder(&self) -> StoreBuilder {
        ProcessStore::builder().with_capacity(self.capacity)
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> MonitorResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| MonitorError::InvalidConfig(format!("{key}={raw} is not a valid number")))
}
