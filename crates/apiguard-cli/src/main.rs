//! apiguard CLI: API usage-contract checking for Java sources.
//!
//! This binary provides the `apiguard` command with subcommands for
//! initialization, checking, fact dumps, rule listing, and watch mode. See
//! `apiguard --help` for usage.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_args;
mod commands;

use cli_args::{Cli, Commands};

/// Environment variable holding a tracing filter, e.g. `apiguard_enforce=debug`.
const LOG_ENV: &str = "APIGUARD_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let formatter: Box<dyn apiguard_output::OutputFormatter> = if cli.json {
        Box::new(apiguard_output::json::JsonFormatter)
    } else {
        Box::new(apiguard_output::human::HumanFormatter)
    };

    let exit_code = match cli.command {
        Commands::Init => commands::init::run(cli.verbose),
        Commands::Check {
            paths,
            strict,
            suppress,
            rules,
            report_dir,
        } => commands::check::run(
            &*formatter,
            cli.verbose,
            commands::check::CheckOptions {
                paths,
                strict,
                suppress,
                rules,
                report_dir,
            },
        ),
        Commands::Facts { file } => commands::facts::run(&*formatter, cli.verbose, file),
        Commands::Rules { rules } => commands::rules::run(&*formatter, cli.verbose, rules),
        Commands::Watch => commands::watch::run(&*formatter, cli.verbose),
    };

    std::process::exit(exit_code);
}

/// Log to stderr. `APIGUARD_LOG` wins; otherwise `warn`, or `debug` with
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
