//! Error rendering using ariadne
//!
//! This module renders [`DataEvalError`]s with source snippets, labels, help
//! notes and error codes.

use crate::{DataEvalError, Diagnostic, Severity};
use ariadne::{ColorGenerator, Config, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

/// Options for rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Emit ANSI color codes.
    pub color: bool,
    /// Name shown in the report header for the source text.
    pub filename: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: true,
            filename: "<input>".to_string(),
        }
    }
}

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use dataeval::{data_eval, render_error};
///
/// if let Err(e) = data_eval("{'a': b}") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &DataEvalError) {
    render_error_with(error, &RenderConfig::default(), &mut std::io::stderr()).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &DataEvalError, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_with(error, &RenderConfig::default(), writer)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &DataEvalError) -> String {
    render_to_string(error, &RenderConfig::default())
}

/// Render an error to a String without color codes (useful for tests)
///
/// # Example
/// ```
/// use dataeval::{data_eval, render_error_to_string_no_color};
///
/// let err = data_eval("[1, os]").unwrap_err();
/// let output = render_error_to_string_no_color(&err);
/// assert!(output.contains("unsafe name 'os'"));
/// assert!(output.contains("[1, os]"));
/// ```
pub fn render_error_to_string_no_color(error: &DataEvalError) -> String {
    let config = RenderConfig {
        color: false,
        ..RenderConfig::default()
    };
    render_to_string(error, &config)
}

fn render_to_string(error: &DataEvalError, config: &RenderConfig) -> String {
    let mut buf = Vec::new();
    render_error_with(error, config, &mut buf).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error with explicit options.
pub fn render_error_with(
    error: &DataEvalError,
    config: &RenderConfig,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    match error.source_text() {
        Some(source) => render_diagnostic(source, &error.to_diagnostic(), config, writer),
        // Nothing to point at.
        None => writeln!(writer, "{}: {}", Severity::Error, error),
    }
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    config: &RenderConfig,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    let name = config.filename.as_str();
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    // Spans are byte offsets.
    let report_config = Config::default()
        .with_color(config.color)
        .with_index_type(IndexType::Byte);

    let mut report = Report::build(kind, (name, diag.span.0.clone()))
        .with_message(&diag.message)
        .with_config(report_config);

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new((name, diag.span.0.clone()))
            .with_message(&diag.message)
            .with_color(color),
    );

    for related in &diag.related {
        let color = colors.next();
        report = report.with_label(
            Label::new((name, related.span.0.clone()))
                .with_message(&related.message)
                .with_color(color),
        );
    }

    for help_msg in &diag.help {
        report = report.with_help(help_msg);
    }

    report.finish().write((name, Source::from(source)), &mut *writer)
}
