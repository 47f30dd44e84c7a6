pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod provision;
pub mod resolver;
pub mod transport;
pub mod validation;

pub use error::RemoteExecError;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

use crate::executor::CommandExecutor;
use crate::transport::LocalTransport;

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .context("failed to set global default tracing subscriber")
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let config = config::load_config(&opts.file)
        .with_context(|| format!("failed to load provisioner block from {}", opts.file))?;
    info!("validation successful: {} mode", config.mode()?);
    Ok(())
}

/// Writes every resolved script to `out`, each under a `# ==> name` header.
pub fn run_resolve(opts: &cli::ResolveArgs, out: &mut dyn Write) -> Result<()> {
    let config = config::load_config(&opts.file)
        .with_context(|| format!("failed to load provisioner block from {}", opts.file))?;
    let scripts = resolver::resolve_streams(&config).context("failed to resolve scripts")?;

    let total = scripts.len();
    for (index, mut body) in scripts.into_iter().enumerate() {
        writeln!(out, "# ==> {}/{}: {}", index + 1, total, body.name())?;
        std::io::copy(&mut body, out)
            .with_context(|| format!("failed to read script: {}", body.name()))?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn run_apply(opts: &cli::ApplyArgs, executor: Arc<dyn CommandExecutor>) -> Result<()> {
    let config = config::load_config(&opts.file)
        .with_context(|| format!("failed to load provisioner block from {}", opts.file))?;

    let mut transport = LocalTransport::new(opts.shell.as_str(), executor, opts.dry_run)
        .context("invalid transport settings")?;
    let scripts = resolver::resolve_streams(&config).context("failed to resolve scripts")?;

    provision::run_scripts(scripts, &mut transport, &opts.script_path)
}
