use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::{Parser, error::ErrorKind};
use table_convertor::{Cli, commands, error::ConvertError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

fn main() -> Result<ExitCode> {
    init_tracing()?;

    let outcome = Cli::try_parse()
        .or_else(|err| match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                debug!(error = %err, "argument parsing failed");
                Err(ConvertError::Usage)
            }
        })
        .and_then(Cli::into_args)
        .and_then(commands::convert::run);

    match outcome {
        Ok(conversion) => {
            println!("{}", conversion.success_message());
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            debug!(error = ?err, "conversion failed");
            println!("{}", err.console_message());
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
