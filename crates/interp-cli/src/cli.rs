//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Locate conda and the Python interpreters installed on this machine
#[derive(Parser, Debug)]
#[command(name = "interp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Resolver configuration file (.toml or .json)
    #[arg(short, long, global = true, env = "INTERP_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Query the conda executable
    Conda {
        #[command(subcommand)]
        action: CondaAction,
    },

    /// List interpreters registered with the operating system
    ///
    /// Only Windows keeps such a registry; elsewhere the list is empty.
    Interpreters {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Conda queries
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CondaAction {
    /// Print the resolved conda executable
    Path,

    /// Print the output of `conda --version`
    Version,

    /// Print whether conda can be run; exits non-zero when it cannot
    Available,
}
