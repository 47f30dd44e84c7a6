//! Sequential execution of resolved scripts.
//!
//! The harness hands every [`ScriptBody`] to a [`Transport`] in order. Each
//! script gets its own target path from a template, and the first failure
//! aborts the remaining scripts.

use anyhow::{Context, Result};
use tracing::info;

use crate::error::RemoteExecError;
use crate::resolver::ScriptBody;
use crate::transport::Transport;

/// Default target path template for uploaded scripts.
pub const DEFAULT_SCRIPT_PATH: &str = "/tmp/remote-exec_%RAND%.sh";

/// Placeholder replaced by a fresh random token per script.
const RAND_PLACEHOLDER: &str = "%RAND%";

/// Expands `%RAND%` in a script path template.
///
/// Every call yields a new token, so consecutive uploads from the same
/// template never collide. Templates without the placeholder are returned
/// unchanged.
pub fn expand_script_path(template: &str) -> String {
    if !template.contains(RAND_PLACEHOLDER) {
        return template.to_string();
    }
    let token = uuid::Uuid::new_v4().simple().to_string();
    template.replace(RAND_PLACEHOLDER, &token)
}

/// Runs scripts one at a time, stopping at the first failure.
///
/// Each body is consumed by the transport and dropped before the next one
/// starts.
pub fn run_scripts(
    scripts: Vec<ScriptBody>,
    transport: &mut dyn Transport,
    script_path: &str,
) -> Result<()> {
    let total = scripts.len();
    info!("running {} script(s) via {} transport", total, transport.name());

    for (index, mut body) in scripts.into_iter().enumerate() {
        let remote_path = expand_script_path(script_path);
        let name = body.name().to_string();
        info!("running script {}/{}: {} -> {}", index + 1, total, name, remote_path);

        let result = transport
            .run_script(&mut body, &remote_path)
            .with_context(|| format!("failed to run script {}/{}: {}", index + 1, total, name))?;

        if !result.success() {
            let status = result
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown (no status available)".to_string());
            return Err(RemoteExecError::Execution {
                command: format!("script {}/{} ({})", index + 1, total, name),
                status,
            }
            .into());
        }
    }

    info!("all scripts completed successfully");
    Ok(())
}
