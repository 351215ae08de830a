//! Command-line interface definitions.
//!
//! This module contains only clap struct definitions - no business logic.
//! All command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use dataeval::{DEFAULT_WIDTH, EvalOptions};

/// dataeval - safe evaluation of Python-style data literals
#[derive(Parser, Debug)]
#[command(name = "dataeval", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Maximum nesting depth of an expression
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,
}

impl Cli {
    pub fn eval_options(&self) -> EvalOptions {
        let mut options = EvalOptions::default();
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        options
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate an expression and print its canonical encoding
    Eval(EvalArgs),

    /// Validate files without printing their values
    Check(CheckArgs),

    /// Evaluate a file and print its value wrapped to a width
    Fmt(FmtArgs),
}

/// Arguments for the `eval` command.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Expression to evaluate
    pub expression: String,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files to check (use - for stdin)
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Only report through the exit code
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `fmt` command.
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// File to format (use - for stdin)
    pub file: String,

    /// Maximum line width
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,
}
