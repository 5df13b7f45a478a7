/*!
 * Text Reports
 * Human-readable renderings of statistics, listings, filter and control state
 */

use crate::core::types::{Timestamp, NANOS_PER_SEC};
use crate::monitor::{ControlStatus, FilterConfig, ListResult, RecordView, StatisticsView};
use std::fmt;

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Statistics block
pub struct StatsReport<'a>(pub &'a StatisticsView);

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "=== Process Monitor Statistics ===")?;
        writeln!(f, "Monitoring Status: {}", on_off(view.monitoring_enabled))?;
        writeln!(f, "Total Processes Created: {}", view.created)?;
        writeln!(f, "Total Processes Exited: {}", view.exited)?;
        writeln!(f, "Current Active Processes: {}", view.current)?;
        writeln!(f, "Peak Processes: {}", view.peak)?;
        writeln!(
            f,
            "Records in Memory: {}/{}",
            view.records_in_memory, view.capacity
        )?;
        writeln!(f)?;
        writeln!(f, "=== Performance Statistics ===")?;
        writeln!(f, "Total CPU Time: {} ms", view.total_cpu_time().as_millis())?;
        writeln!(f, "Average Lifetime: {} seconds", view.avg_lifetime().as_secs())?;
        writeln!(f, "Longest Lifetime: {} seconds", view.max_lifetime().as_secs())?;
        writeln!(f, "Shortest Lifetime: {} seconds", view.min_lifetime().as_secs())?;
        if let Some(rate) = view.turnover_rate() {
            writeln!(f, "Process Turnover Rate: {rate} proc/sec")?;
        }
        Ok(())
    }
}

/// Record table with truncation note and match count
pub struct ProcessTable<'a> {
    pub title: &'a str,
    pub result: &'a ListResult,
}

impl<'a> ProcessTable<'a> {
    pub fn new(result: &'a ListResult) -> Self {
        Self {
            title: "Process Records",
            result,
        }
    }

    pub fn titled(title: &'a str, result: &'a ListResult) -> Self {
        Self { title, result }
    }
}

impl fmt::Display for ProcessTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        writeln!(
            f,
            "{:<8} {:<8} {:<16} {:<12} {:<12} {:<8} {:<9} {:<12}",
            "PID", "PPID", "COMMAND", "START_TIME", "END_TIME", "STATUS", "EXIT_CODE", "LIFETIME"
        )?;
        writeln!(f, "{RULE}")?;

        for record in &self.result.records {
            write_row(f, record)?;
        }

        if self.result.truncated {
            writeln!(
                f,
                "... (showing first {} matching records)",
                self.result.records.len()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total matching records: {}", self.result.total_matched)
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, record: &RecordView) -> fmt::Result {
    let end = record
        .ended_at
        .map(seconds)
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        f,
        "{:<8} {:<8} {:<16} {:<12} {:<12} {:<8} {:<9} {:<12}",
        record.pid,
        record.parent_pid,
        record.name,
        seconds(record.started_at),
        end,
        record.status.as_str(),
        record.exit_code,
        record.lifetime_secs()
    )
}

/// Store time as seconds with millisecond precision
fn seconds(ts: Timestamp) -> String {
    format!("{}.{:03}", ts / NANOS_PER_SEC, (ts % NANOS_PER_SEC) / 1_000_000)
}

/// Filter configuration block with the filter command summary
pub struct FilterReport<'a>(pub &'a FilterConfig);

impl fmt::Display for FilterReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        writeln!(f, "=== Process Filter Configuration ===")?;
        writeln!(
            f,
            "Filter Enabled: {}",
            if config.enabled { "YES" } else { "NO" }
        )?;
        writeln!(f, "Target PID: {} (0 = any)", config.pid.unwrap_or(0))?;
        writeln!(f, "Target PPID: {} (0 = any)", config.parent_pid.unwrap_or(0))?;
        writeln!(
            f,
            "Target Command: {} (empty = any)",
            config.command.as_ref().map(|c| c.as_str()).unwrap_or("")
        )?;
        writeln!(
            f,
            "Min Lifetime: {} seconds (0 = no limit)",
            config.min_lifetime_secs.unwrap_or(0)
        )?;
        writeln!(
            f,
            "Max Lifetime: {} seconds (0 = no limit)",
            config.max_lifetime_secs.unwrap_or(0)
        )?;
        writeln!(f)?;
        writeln!(f, "=== Filter Commands ===")?;
        writeln!(f, "enable           - Enable filtering")?;
        writeln!(f, "disable          - Disable filtering")?;
        writeln!(f, "pid <pid>        - Filter by PID")?;
        writeln!(f, "ppid <ppid>      - Filter by parent PID")?;
        writeln!(f, "comm <command>   - Filter by command name")?;
        writeln!(f, "minlife <sec>    - Minimum lifetime filter")?;
        writeln!(f, "maxlife <sec>    - Maximum lifetime filter")?;
        writeln!(f, "reset            - Reset all filters")
    }
}

/// Control state block with the control command summary
pub struct ControlReport<'a>(pub &'a ControlStatus);

impl fmt::Display for ControlReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.0;
        writeln!(f, "=== Process Monitor Control ===")?;
        writeln!(f, "Monitoring: {}", on_off(status.monitoring_enabled))?;
        writeln!(f, "Records: {}/{}", status.records, status.capacity)?;
        writeln!(f)?;
        writeln!(f, "=== Control Commands ===")?;
        writeln!(f, "start            - Start monitoring")?;
        writeln!(f, "stop             - Stop monitoring")?;
        writeln!(f, "clear            - Clear all records")?;
        writeln!(f, "reset_stats      - Reset statistics")
    }
}

pub const HELP: &str = "\
Control:   start | stop | clear | reset_stats
Filter:    enable | disable | reset | pid <n> | ppid <n> | comm <name>
           minlife <sec> | maxlife <sec>
Reports:   stats | processes [limit] | recent <n> | filter | control | json [limit]
Events:    fork <pid> <ppid> <name> | exit <pid> <code>
Session:   help | quit
";

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "ENABLED"
    } else {
        "DISABLED"
    }
}
