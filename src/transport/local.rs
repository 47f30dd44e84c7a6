//! Transport running scripts on the local machine.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use super::Transport;
use crate::error::RemoteExecError;
use crate::executor::{CommandExecutor, CommandSpec, ExecutionResult};

/// Default interpreter for uploaded scripts.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs scripts on the local filesystem through a [`CommandExecutor`].
///
/// Each script is written to its target path with mode 0700, executed as
/// `<shell> <path>`, and removed afterwards even if execution fails. In dry
/// run mode the body is drained and measured, nothing is written and the
/// executor is still consulted so it can log the command.
pub struct LocalTransport {
    shell: String,
    executor: Arc<dyn CommandExecutor>,
    dry_run: bool,
}

impl LocalTransport {
    /// Creates a transport, requiring an absolute shell path.
    pub fn new(
        shell: impl Into<String>,
        executor: Arc<dyn CommandExecutor>,
        dry_run: bool,
    ) -> Result<Self, RemoteExecError> {
        let shell = shell.into();
        if shell.is_empty() {
            return Err(RemoteExecError::Config("shell path must not be empty".to_string()));
        }
        if !shell.starts_with('/') {
            return Err(RemoteExecError::Config(format!(
                "shell path must be absolute (start with '/'): {}",
                shell
            )));
        }
        Ok(Self {
            shell,
            executor,
            dry_run,
        })
    }

    /// Creates the target exclusively, owner-only from the start.
    fn create_script(target: &Utf8Path) -> Result<File, RemoteExecError> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o700);
        }
        options
            .open(target)
            .map_err(|e| RemoteExecError::io(format!("failed to create script: {}", target), e))
    }

    fn upload(body: &mut dyn Read, mut file: File, target: &Utf8Path) -> Result<u64> {
        let written = io::copy(body, &mut file)
            .map_err(|e| RemoteExecError::io(format!("failed to upload script: {}", target), e))?;
        Ok(written)
    }
}

impl Transport for LocalTransport {
    fn name(&self) -> &str {
        "local"
    }

    fn run_script(&mut self, body: &mut dyn Read, remote_path: &str) -> Result<ExecutionResult> {
        let target = Utf8PathBuf::from(remote_path);
        let spec = CommandSpec::new(self.shell.as_str(), vec![remote_path.to_string()]);

        if self.dry_run {
            let size = io::copy(body, &mut io::sink()).context("failed to read script body")?;
            info!("dry run: would upload {} byte(s) to {}", size, target);
            return self.executor.execute(&spec);
        }

        // create_new: never overwrite or later remove a file this run does not own.
        let file = Self::create_script(&target)?;
        let _guard = ScriptGuard::new(target.clone());
        let size = Self::upload(body, file, &target)?;
        debug!("uploaded {} byte(s) to {}", size, target);

        self.executor
            .execute(&spec)
            .with_context(|| format!("failed to execute script {}", target))
    }
}

/// RAII guard removing an uploaded script.
struct ScriptGuard {
    path: Utf8PathBuf,
}

impl ScriptGuard {
    fn new(path: Utf8PathBuf) -> Self {
        Self { path }
    }
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("cleaned up script: {}", self.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("script already removed: {}", self.path);
            }
            Err(e) => {
                tracing::error!("failed to cleanup script {}: {}", self.path, e);
            }
        }
    }
}
