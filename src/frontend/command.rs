/*!
 * Command Parser
 * One stdin line to one typed command
 *
 * Parsing checks arity and numeric arguments up front. Filter values are
 * validated by the filter manager before it takes its lock, so a rejected
 * line never changes any state.
 */

use crate::core::errors::CommandError;
use crate::core::types::{ExitCode, Pid};
use crate::monitor::{ControlCommand, FilterField};
use std::str::{FromStr, SplitWhitespace};

/// Parsed front-end command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Control(ControlCommand),

    EnableFilter,
    DisableFilter,
    ResetFilter,
    SetFilter { field: FilterField, value: String },

    Stats,
    /// Filtered listing, default limit when `None`
    Processes(Option<usize>),
    Recent(usize),
    ShowFilter,
    ShowControl,
    Json(Option<usize>),

    Fork {
        pid: Pid,
        parent_pid: Pid,
        name: String,
    },
    Exit {
        pid: Pid,
        exit_code: ExitCode,
    },

    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut args = Args::new(line);
        let Some(word) = args.next_word() else {
            return Err(CommandError::Unknown(String::new()));
        };

        let command = match word {
            "start" => Self::Control(ControlCommand::Start),
            "stop" => Self::Control(ControlCommand::Stop),
            "clear" => Self::Control(ControlCommand::Clear),
            "reset_stats" => Self::Control(ControlCommand::ResetStatistics),

            "enable" => Self::EnableFilter,
            "disable" => Self::DisableFilter,
            "reset" => Self::ResetFilter,
            "pid" | "ppid" | "comm" | "minlife" | "maxlife" => {
                let field: FilterField = word.parse()?;
                Self::SetFilter {
                    field,
                    value: args.required(field.as_str())?.to_string(),
                }
            }

            "stats" => Self::Stats,
            "processes" => Self::Processes(args.optional_limit("processes")?),
            "recent" => Self::Recent(args.limit("recent")?),
            "filter" => Self::ShowFilter,
            "control" => Self::ShowControl,
            "json" => Self::Json(args.optional_limit("json")?),

            "fork" => Self::Fork {
                pid: args.number("fork")?,
                parent_pid: args.number("fork")?,
                name: args.required("fork")?.to_string(),
            },
            "exit" => Self::Exit {
                pid: args.number("exit")?,
                exit_code: args.number("exit")?,
            },

            "help" | "?" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        args.finish(command.name())?;
        Ok(command)
    }

    /// Leading keyword, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Control(ControlCommand::Start) => "start",
            Self::Control(ControlCommand::Stop) => "stop",
            Self::Control(ControlCommand::Clear) => "clear",
            Self::Control(ControlCommand::ResetStatistics) => "reset_stats",
            Self::EnableFilter => "enable",
            Self::DisableFilter => "disable",
            Self::ResetFilter => "reset",
            Self::SetFilter { field, .. } => field.as_str(),
            Self::Stats => "stats",
            Self::Processes(_) => "processes",
            Self::Recent(_) => "recent",
            Self::ShowFilter => "filter",
            Self::ShowControl => "control",
            Self::Json(_) => "json",
            Self::Fork { .. } => "fork",
            Self::Exit { .. } => "exit",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Args<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            words: line.split_whitespace(),
        }
    }

    fn next_word(&mut self) -> Option<&'a str> {
        self.words.next()
    }

    fn required(&mut self, command: &'static str) -> Result<&'a str, CommandError> {
        self.words
            .next()
            .ok_or(CommandError::MissingArgument(command))
    }

    fn number<T: FromStr>(&mut self, command: &'static str) -> Result<T, CommandError> {
        let raw = self.required(command)?;
        raw.parse().map_err(|_| CommandError::InvalidArgument {
            command,
            value: raw.to_string(),
        })
    }

    /// Positive record count
    fn limit(&mut self, command: &'static str) -> Result<usize, CommandError> {
        let raw = self.required(command)?;
        match raw.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(CommandError::InvalidArgument {
                command,
                value: raw.to_string(),
            }),
        }
    }

    fn optional_limit(&mut self, command: &'static str) -> Result<Option<usize>, CommandError> {
        if self.words.clone().next().is_none() {
            return Ok(None);
        }
        self.limit(command).map(Some)
    }

    fn finish(mut self, command: &'static str) -> Result<(), CommandError> {
        match self.words.next() {
            None => Ok(()),
            Some(extra) => Err(CommandError::UnexpectedArgument {
                command,
                argument: extra.to_string(),
            }),
        }
    }
}
