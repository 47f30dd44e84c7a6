//! Executor running real processes.
//!
//! [`RealCommandExecutor`] spawns commands with `std::process::Command` and
//! streams their output into the log while they run.

use std::process::{Child, Command, Stdio};
use std::thread;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use which::which;

use super::pipe::{StreamType, panic_message, read_pipe_to_log};
use super::{CommandExecutor, CommandSpec, ExecutionResult};
use crate::error::RemoteExecError;

/// Kills the child, reaps it and joins any reader threads.
fn cleanup_child_process<I>(child: &mut Child, handles: I)
where
    I: IntoIterator<Item = JoinHandle<()>>,
{
    let pid = child.id();
    if let Err(e) = child.kill() {
        tracing::debug!(pid = pid, "kill returned error (process may have already exited): {}", e);
    }
    if let Err(e) = child.wait() {
        tracing::warn!(pid = pid, "failed to wait for child process after kill: {}", e);
    }
    for handle in handles {
        if let Err(e) = handle.join() {
            tracing::warn!("reader thread panicked during cleanup: {}", panic_message(&*e));
        }
    }
}

fn spawn_reader<R>(
    pipe: Option<R>,
    stream_type: StreamType,
    command: String,
) -> std::io::Result<JoinHandle<()>>
where
    R: std::io::Read + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{}-reader", stream_type))
        .spawn(move || read_pipe_to_log(pipe, stream_type, &command))
}

/// Command executor that runs actual system commands.
///
/// When `dry_run` is true, commands are logged but not executed,
/// and `execute()` returns `Ok(ExecutionResult { status: None })`.
pub struct RealCommandExecutor {
    pub dry_run: bool,
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
        if self.dry_run {
            tracing::info!("dry run: {}", spec.display());
            return Ok(ExecutionResult { status: None });
        }

        let cmd =
            which(&spec.command).with_context(|| format!("command not found: {}", spec.command))?;
        tracing::trace!("command found: {}: {}", spec.command, cmd.to_string_lossy());

        let mut command = Command::new(cmd);
        command.args(&spec.args);

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn command `{}`", spec.display()))?;

        tracing::trace!("spawned command: {}: pid={}", spec.command, child.id());

        let failure = |status: String| RemoteExecError::Execution {
            command: spec.display(),
            status,
        };

        let stdout_handle =
            match spawn_reader(child.stdout.take(), StreamType::Stdout, spec.display()) {
                Ok(handle) => handle,
                Err(e) => {
                    cleanup_child_process(&mut child, []);
                    return Err(failure(format!("failed to spawn stdout reader thread: {}", e)).into());
                }
            };

        let stderr_handle =
            match spawn_reader(child.stderr.take(), StreamType::Stderr, spec.display()) {
                Ok(handle) => handle,
                Err(e) => {
                    cleanup_child_process(&mut child, [stdout_handle]);
                    return Err(failure(format!("failed to spawn stderr reader thread: {}", e)).into());
                }
            };

        let status = match child.wait() {
            Ok(s) => s,
            Err(e) => {
                cleanup_child_process(&mut child, [stdout_handle, stderr_handle]);
                return Err(failure(format!("failed to wait for command: {}", e)).into());
            }
        };

        let mut panicked_streams = Vec::new();
        for (name, handle) in [("stdout", stdout_handle), ("stderr", stderr_handle)] {
            if let Err(e) = handle.join() {
                let msg = panic_message(&*e);
                tracing::error!(stream = name, panic = msg, "reader thread panicked");
                panicked_streams.push(format!("{}: {}", name, msg));
            }
        }

        if !panicked_streams.is_empty() {
            return Err(failure(format!(
                "reader thread(s) panicked during command execution: {}",
                panicked_streams.join(", ")
            ))
            .into());
        }

        tracing::trace!("executed command: {}: success={}", spec.command, status.success());

        Ok(ExecutionResult {
            status: Some(status),
        })
    }
}
