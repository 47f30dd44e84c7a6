//! Transports that deliver resolved scripts to a target and run them.
//!
//! A transport receives one script at a time: it uploads the body to the
//! given path on the target, executes it, and removes it again. Connection
//! handling, authentication and retries are the transport's own business.

mod local;

use std::io::Read;

use anyhow::Result;

use crate::executor::ExecutionResult;

pub use local::{DEFAULT_SHELL, LocalTransport};

/// Trait for script transports.
pub trait Transport {
    /// Returns a short name for logs (e.g., "local").
    fn name(&self) -> &str;

    /// Uploads `body` to `remote_path`, executes it and cleans it up.
    ///
    /// The body must be drained completely. A non-zero exit is reported
    /// through the returned [`ExecutionResult`], not as an error.
    fn run_script(&mut self, body: &mut dyn Read, remote_path: &str) -> Result<ExecutionResult>;
}
