use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::CommandFactory;
use remote_exec::cli::{self, Commands};
use remote_exec::executor::RealCommandExecutor;
use tracing::error;

fn main() -> Result<()> {
    let args = cli::parse_args()?;

    remote_exec::init_logging(args.command.log_level())?;

    let result = match &args.command {
        Commands::Apply(opts) => {
            let executor = Arc::new(RealCommandExecutor {
                dry_run: opts.dry_run,
            });
            remote_exec::run_apply(opts, executor)
        }
        Commands::Validate(opts) => remote_exec::run_validate(opts),
        Commands::Resolve(opts) => remote_exec::run_resolve(opts, &mut std::io::stdout().lock()),
        Commands::Completions(opts) => {
            let mut cmd = cli::Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(opts.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}
