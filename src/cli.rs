use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::provision::DEFAULT_SCRIPT_PATH;
use crate::transport::DEFAULT_SHELL;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the provisioner block and run its scripts one at a time
    Apply(ApplyArgs),

    /// Validate the given provisioner block
    Validate(ValidateArgs),

    /// Print the scripts the provisioner block resolves to, in order
    Resolve(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the YAML file defining the provisioner block
    #[arg(short, long, default_value = "provisioner.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Do not run, just show what would be done
    #[arg(long)]
    pub dry_run: bool,

    /// Shell interpreter used to run each script
    #[arg(long, default_value = DEFAULT_SHELL)]
    pub shell: String,

    /// Target path for uploaded scripts; `%RAND%` is replaced per script
    #[arg(long, default_value = DEFAULT_SCRIPT_PATH)]
    pub script_path: String,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the YAML file to validate
    #[arg(short, long, default_value = "provisioner.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the YAML file defining the provisioner block
    #[arg(short, long, default_value = "provisioner.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

/// Log levels accepted by `--log-level`, mapped onto `tracing` levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Commands {
    /// Returns the log level requested by the subcommand.
    ///
    /// Completions output goes to stdout, so only errors are logged.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Apply(opts) => opts.log_level,
            Self::Validate(opts) => opts.log_level,
            Self::Resolve(opts) => opts.log_level,
            Self::Completions(_) => LogLevel::Error,
        }
    }
}

pub fn parse_args() -> Result<Cli> {
    Ok(Cli::parse())
}
