//! The `fmt` command - print a value wrapped to a width.

use std::process::ExitCode;

use dataeval::{DataEval, EvalOptions, to_pretty_string};

use crate::cli::FmtArgs;
use crate::common::error::render_eval_error;
use crate::common::input::read_input;

/// Run the fmt command.
pub fn run(args: FmtArgs, options: &EvalOptions, no_color: bool) -> ExitCode {
    let (content, display_name) = match read_input(&args.file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match DataEval::new(options.clone()).parse(content.as_str()) {
        Ok(value) => {
            println!("{}", to_pretty_string(&value, args.width));
            ExitCode::SUCCESS
        }
        Err(e) => {
            render_eval_error(&e, &display_name, no_color);
            ExitCode::FAILURE
        }
    }
}
