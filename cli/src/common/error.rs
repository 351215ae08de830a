//! Error reporting for the CLI.

use dataeval::{DataEvalError, RenderConfig, render_error_with};

/// Render an evaluation error to stderr.
pub fn render_eval_error(error: &DataEvalError, filename: &str, no_color: bool) {
    let config = RenderConfig {
        color: !no_color,
        filename: filename.to_string(),
    };
    render_error_with(error, &config, &mut std::io::stderr()).ok();
}

/// Report an error that has no source location.
pub fn report(error: &dyn std::error::Error) {
    eprintln!("error: {}", error);
}
