use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "apiguard",
    version,
    about = "Check Java code against API usage contracts"
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as structured JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Progress on stderr and debug logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Create .apiguard/ with default config and an editable rule catalog
    Init,

    /// Check Java files against the rule catalog
    Check {
        /// Files or directories to check (default: the current directory)
        paths: Vec<String>,
        /// Exit 1 when any unsuppressed finding is reported
        #[arg(long)]
        strict: bool,
        /// Suppress a finding code (repeatable, or comma-separated)
        #[arg(long, value_delimiter = ',')]
        suppress: Vec<String>,
        /// Rule catalog to use instead of the configured one
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Append API chain reports to this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },

    /// Show the call events and chains extracted from a file
    Facts {
        /// Java source file
        file: PathBuf,
    },

    /// List the loaded usage contracts
    Rules {
        /// Rule catalog to use instead of the configured one
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Re-check Java files as they change
    Watch,
}

#[cfg(test)]
#[path = "cli_args_tests.rs"]
mod tests;
