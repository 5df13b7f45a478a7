/*!
 * Filter Engine
 * Read-time predicates over records plus their guarded configuration
 *
 * Matching is a pure function of a record and a [`FilterConfig`] copy. The
 * configuration lives behind its own blocking lock, separate from the store
 * lock, since it changes rarely and is read by slow report paths.
 */

use super::record::{Record, RecordView};
use crate::core::data_structures::CommName;
use crate::core::errors::FilterError;
use crate::core::types::{Pid, NANOS_PER_SEC};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Record fields a filter can inspect
pub trait Filterable {
    fn pid(&self) -> Pid;
    fn parent_pid(&self) -> Pid;
    fn name(&self) -> &str;
    /// Lifetime in whole seconds, `None` while running
    fn lifetime_secs(&self) -> Option<u64>;
}

impl Filterable for Record {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn parent_pid(&self) -> Pid {
        self.parent_pid
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn lifetime_secs(&self) -> Option<u64> {
        self.lifetime_ns().map(|ns| ns / NANOS_PER_SEC)
    }
}

impl Filterable for RecordView {
    fn pid(&self) -> Pid {
        self.pid
    }

    fn parent_pid(&self) -> Pid {
        self.parent_pid
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn lifetime_secs(&self) -> Option<u64> {
        self.ended_at
            .map(|end| (end - self.started_at) / NANOS_PER_SEC)
    }
}

/// Filter predicates; `None` imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub enabled: bool,
    pub pid: Option<Pid>,
    pub parent_pid: Option<Pid>,
    pub command: Option<CommName>,
    pub min_lifetime_secs: Option<u64>,
    pub max_lifetime_secs: Option<u64>,
}

impl FilterConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    #[inline]
    pub fn pid(mut self, pid: Pid) -> Self {
        self.pid = Some(pid);
        self
    }

    #[inline]
    pub fn parent_pid(mut self, parent_pid: Pid) -> Self {
        self.parent_pid = Some(parent_pid);
        self
    }

    #[inline]
    pub fn command(mut self, command: &str) -> Self {
        self.command = Some(CommName::new(command));
        self
    }

    #[inline]
    pub fn min_lifetime(mut self, secs: u64) -> Self {
        self.min_lifetime_secs = Some(secs);
        self
    }

    #[inline]
    pub fn max_lifetime(mut self, secs: u64) -> Self {
        self.max_lifetime_secs = Some(secs);
        self
    }

    /// Evaluate every configured predicate against `record`
    #[inline]
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        matches(record, self)
    }

    fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Pid(pid) => self.pid = pid,
            FilterUpdate::ParentPid(ppid) => self.parent_pid = ppid,
            FilterUpdate::Command(command) => self.command = command,
            FilterUpdate::MinLifetime(secs) => self.min_lifetime_secs = secs,
            FilterUpdate::MaxLifetime(secs) => self.max_lifetime_secs = secs,
        }
    }
}

/// Pure predicate evaluation
///
/// A disabled filter matches everything. Lifetime bounds only apply to exited
/// records; running records always pass them.
pub fn matches<R: Filterable + ?Sized>(record: &R, config: &FilterConfig) -> bool {
    if !config.enabled {
        return true;
    }

    if let Some(pid) = config.pid {
        if record.pid() != pid {
            return false;
        }
    }

    if let Some(ppid) = config.parent_pid {
        if record.parent_pid() != ppid {
            return false;
        }
    }

    if let Some(command) = &config.command {
        if record.name() != command.as_str() {
            return false;
        }
    }

    if let Some(lifetime) = record.lifetime_secs() {
        if let Some(min) = config.min_lifetime_secs {
            if lifetime < min {
                return false;
            }
        }
        if let Some(max) = config.max_lifetime_secs {
            if lifetime > max {
                return false;
            }
        }
    }

    true
}

/// Settable filter field, named as in the control protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Pid,
    ParentPid,
    Command,
    MinLifetime,
    MaxLifetime,
}

impl FilterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pid => "pid",
            Self::ParentPid => "ppid",
            Self::Command => "comm",
            Self::MinLifetime => "minlife",
            Self::MaxLifetime => "maxlife",
        }
    }

    /// Parse a raw value for this field; zero clears numeric predicates
    fn parse_value(self, value: &str) -> Result<FilterUpdate, FilterError> {
        let value = value.trim();
        let invalid = || FilterError::InvalidNumber {
            field: self.as_str().to_string(),
            value: value.to_string(),
        };

        let update = match self {
            Self::Pid => FilterUpdate::Pid(nonzero(value.parse().map_err(|_| invalid())?)),
            Self::ParentPid => {
                FilterUpdate::ParentPid(nonzero(value.parse().map_err(|_| invalid())?))
            }
            Self::MinLifetime => {
                FilterUpdate::MinLifetime(nonzero(value.parse().map_err(|_| invalid())?))
            }
            Self::MaxLifetime => {
                FilterUpdate::MaxLifetime(nonzero(value.parse().map_err(|_| invalid())?))
            }
            Self::Command => {
                if value.is_empty() {
                    return Err(FilterError::EmptyCommand);
                }
                FilterUpdate::Command(Some(CommName::new(value)))
            }
        };
        Ok(update)
    }
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pid" => Ok(Self::Pid),
            "ppid" => Ok(Self::ParentPid),
            "comm" => Ok(Self::Command),
            "minlife" => Ok(Self::MinLifetime),
            "maxlife" => Ok(Self::MaxLifetime),
            other => Err(FilterError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully parsed single-field change
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterUpdate {
    Pid(Option<Pid>),
    ParentPid(Option<Pid>),
    Command(Option<CommName>),
    MinLifetime(Option<u64>),
    MaxLifetime(Option<u64>),
}

fn nonzero<T: Default + PartialEq>(value: T) -> Option<T> {
    if value == T::default() {
        None
    } else {
        Some(value)
    }
}

/// Guarded filter configuration shared by the store and the front-end
#[derive(Debug, Default)]
pub struct FilterManager {
    config: RwLock<FilterConfig>,
}

impl FilterManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Copy of the active configuration
    pub fn current(&self) -> FilterConfig {
        self.config.read().clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.read().enabled
    }

    pub fn enable(&self) {
        self.config.write().enabled = true;
        info!("filter enabled");
    }

    pub fn disable(&self) {
        self.config.write().enabled = false;
        info!("filter disabled");
    }

    /// Clear every predicate and disable the filter
    pub fn reset(&self) {
        *self.config.write() = FilterConfig::default();
        info!("filter reset");
    }

    /// Replace the whole configuration at once
    pub fn configure(&self, config: FilterConfig) {
        *self.config.write() = config;
    }

    /// Parse and apply one textual field update
    ///
    /// The value is validated before the lock is taken; on error the
    /// configuration is left untouched.
    pub fn set(&self, field: FilterField, value: &str) -> Result<(), FilterError> {
        let update = field.parse_value(value)?;
        self.config.write().apply(update);
        info!(field = %field, value = value.trim(), "filter updated");
        Ok(())
    }

    pub fn set_pid(&self, pid: Pid) {
        self.config.write().apply(FilterUpdate::Pid(nonzero(pid)));
    }

    pub fn set_parent_pid(&self, parent_pid: Pid) {
        self.config
            .write()
            .apply(FilterUpdate::ParentPid(nonzero(parent_pid)));
    }

    /// Exact command-name predicate, an empty name clears it
    pub fn set_command(&self, command: &str) {
        let command = (!command.is_empty()).then(|| CommName::new(command));
        self.config.write().apply(FilterUpdate::Command(command));
    }

    pub fn set_min_lifetime(&self, secs: u64) {
        self.config
            .write()
            .apply(FilterUpdate::MinLifetime(nonzero(secs)));
    }

    pub fn set_max_lifetime(&self, secs: u64) {
        self.config
            .write()
            .apply(FilterUpdate::MaxLifetime(nonzero(secs)));
    }

    /// Evaluate the active configuration against a record
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        matches(record, &self.config.read())
    }
}
