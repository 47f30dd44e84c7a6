//! Command execution abstraction used by the local transport.
//!
//! This module provides:
//! - [`CommandSpec`]: what to run
//! - [`ExecutionResult`]: how it ended
//! - [`CommandExecutor`]: trait for execution strategies
//! - [`RealCommandExecutor`]: implementation on top of `std::process::Command`

mod pipe;
mod real;

use std::process::ExitStatus;

use anyhow::Result;

pub use real::RealCommandExecutor;

/// Specification for a command to be executed
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The command to execute (e.g., "/bin/sh")
    pub command: String,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Creates a new CommandSpec with command and args
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Renders the command line for logs and error messages.
    pub fn display(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of command execution
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the command (None in dry-run mode)
    pub status: Option<ExitStatus>,
}

impl ExecutionResult {
    /// Returns true if the command executed successfully.
    ///
    /// In dry-run mode (status is None), this always returns true.
    pub fn success(&self) -> bool {
        self.status.is_none_or(|s| s.success())
    }

    /// Returns the exit code if available
    pub fn code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }
}

/// Trait for command execution.
pub trait CommandExecutor: Send + Sync {
    /// Executes a command with the given specification.
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_command_and_args() {
        let spec = CommandSpec::new("/bin/sh", vec!["/tmp/remote-exec_1.sh".to_string()]);
        assert_eq!(spec.display(), "/bin/sh /tmp/remote-exec_1.sh");
    }

    #[test]
    fn test_dry_run_result_is_success() {
        let result = ExecutionResult { status: None };
        assert!(result.success());
        assert_eq!(result.code(), None);
    }
}
