//! Interpreter resolver CLI
//!
//! Reports where conda lives and which Python interpreters the operating
//! system knows about.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use interp_locator::{CondaResolver, InterpreterSource, WindowsRegistrySource};
use interp_platform::RegistryReader;
use std::process::ExitCode;

use cli::{Cli, Commands, CondaAction};
use error::{CliError, Result};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "warn" };
    interp_platform::logging::init(directive)
        .map_err(|e| CliError::user(format!("failed to initialize logging: {e}")))?;
    tracing::debug!("Verbose mode enabled");

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Conda { action } => {
            let resolver = CondaResolver::for_host(config);
            match action {
                CondaAction::Path => commands::run_conda_path(&resolver).await,
                CondaAction::Version => commands::run_conda_version(&resolver).await,
                CondaAction::Available => commands::run_conda_available(&resolver).await,
            }
        }
        Commands::Interpreters { json } => {
            let source = cfg!(windows).then(|| WindowsRegistrySource::new(RegistryReader::for_host()));
            commands::run_interpreters(source.as_ref().map(|s| s as &dyn InterpreterSource), json)
                .await
        }
    }
}
