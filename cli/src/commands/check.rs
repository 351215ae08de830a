//! The `check` command - validate files without printing their values.

use std::process::ExitCode;

use dataeval::{DataEval, EvalOptions};

use crate::cli::CheckArgs;
use crate::common::error::render_eval_error;
use crate::common::input::read_input;

/// Run the check command.
pub fn run(args: CheckArgs, options: &EvalOptions, no_color: bool) -> ExitCode {
    let evaluator = DataEval::new(options.clone());
    let mut has_errors = false;

    for file in &args.files {
        if !check_file(&evaluator, file, args.quiet, no_color) {
            has_errors = true;
        }
    }

    if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Check a single file. Returns true if OK, false if errors.
fn check_file(evaluator: &DataEval, path: &str, quiet: bool, no_color: bool) -> bool {
    let (content, display_name) = match read_input(path) {
        Ok(c) => c,
        Err(e) => {
            if !quiet {
                eprintln!("error: {}", e);
            }
            return false;
        }
    };

    if let Err(e) = evaluator.parse(content.as_str()) {
        tracing::debug!(file = %display_name, kind = ?e.kind(), "check failed");
        if !quiet {
            render_eval_error(&e, &display_name, no_color);
        }
        return false;
    }

    if !quiet {
        println!("{}: OK", display_name);
    }
    true
}
