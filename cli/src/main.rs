//! dataeval CLI - evaluate, validate and pretty-print data literals.

mod cli;
mod commands;
mod common;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};

fn main() -> ExitCode {
    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let options = cli.eval_options();

    match cli.command {
        Command::Eval(args) => commands::eval::run(args, &options, cli.no_color),
        Command::Check(args) => commands::check::run(args, &options, cli.no_color),
        Command::Fmt(args) => commands::fmt::run(args, &options, cli.no_color),
    }
}
