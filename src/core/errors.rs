/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store and configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MonitorError {
    #[error("Record allocation failed: {0}")]
    #[diagnostic(
        code(monitor::allocation_failed),
        help("The event was dropped. System may be low on memory.")
    )]
    AllocationFailed(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(monitor::invalid_config),
        help("Check PROCMON_* environment variables.")
    )]
    InvalidConfig(String),
}

/// Filter configuration errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum FilterError {
    #[error("Invalid value '{value}' for filter '{field}': expected a non-negative integer")]
    #[diagnostic(
        code(filter::invalid_number),
        help("pid, ppid, minlife and maxlife take whole numbers.")
    )]
    InvalidNumber { field: String, value: String },

    #[error("Unknown filter field: {0}")]
    #[diagnostic(
        code(filter::unknown_field),
        help("Use one of: pid, ppid, comm, minlife, maxlife.")
    )]
    UnknownField(String),

    #[error("Command name filter must not be empty")]
    #[diagnostic(
        code(filter::empty_command),
        help("Use 'reset' to clear every predicate instead.")
    )]
    EmptyCommand,
}

/// Front-end command errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    #[diagnostic(code(command::unknown), help("Type 'help' for the command list."))]
    Unknown(String),

    #[error("Command '{0}' requires an argument")]
    #[diagnostic(code(command::missing_argument))]
    MissingArgument(&'static str),

    #[error("Command '{command}' got unexpected argument '{argument}'")]
    #[diagnostic(code(command::unexpected_argument))]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },

    #[error("Invalid argument '{value}' for '{command}'")]
    #[diagnostic(code(command::invalid_argument))]
    InvalidArgument {
        command: &'static str,
        value: String,
    },

    #[error("Filter error: {0}")]
    #[diagnostic(transparent)]
    Filter(#[from] FilterError),

    #[error("Failed to render report: {0}")]
    #[diagnostic(code(command::render))]
    Render(String),
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_serialization() {
        let err = FilterError::InvalidNumber {
            field: "pid".to_string(),
            value: "abc".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("invalid_number"));

        let back: FilterError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_allocation_failure_diagnostic() {
        let err = MonitorError::AllocationFailed("capacity overflow".to_string());
        assert_eq!(err.to_string(), "Record allocation failed: capacity overflow");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("monitor::allocation_failed".to_string())
        );
        assert!(err.help().is_some());
    }

    #[test]
    fn test_command_error_wraps_filter_error() {
        let err: CommandError = FilterError::UnknownField("uid".to_string()).into();
        assert!(err.to_string().contains("uid"));
    }
}
