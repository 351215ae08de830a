//! The `eval` command - evaluate one expression.

use std::process::ExitCode;

use dataeval::{DataEval, EvalOptions, encode};

use crate::cli::EvalArgs;
use crate::common::error::{render_eval_error, report};

/// Run the eval command.
pub fn run(args: EvalArgs, options: &EvalOptions, no_color: bool) -> ExitCode {
    let evaluator = DataEval::new(options.clone());
    let value = match evaluator.parse(args.expression.as_str()) {
        Ok(value) => value,
        Err(e) => {
            render_eval_error(&e, "<expression>", no_color);
            return ExitCode::FAILURE;
        }
    };

    match encode(&value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}
