use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};

/// Parser error with context
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Unclosed delimiter
    UnclosedDelimiter { delimiter: char },
    /// Invalid number literal
    InvalidNumber { text: String },
    /// Malformed string or bytes literal (bad escape, mixed prefixes, ...)
    InvalidLiteral { message: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { depth: usize, max_depth: usize },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            source: source.into(),
            span,
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => (
                format!("Expected {}, found {}", expected, found),
                "P001",
                vec![],
            ),
            ParseErrorKind::UnclosedDelimiter { delimiter } => (
                format!("Unclosed delimiter '{}'", delimiter),
                "P002",
                vec!["Add the missing closing delimiter".to_string()],
            ),
            ParseErrorKind::InvalidNumber { text } => (
                format!("Invalid number literal '{}'", text),
                "P003",
                vec!["Integers must fit in a signed 64-bit value".to_string()],
            ),
            ParseErrorKind::MaxDepthExceeded { max_depth, .. } => (
                format!(
                    "Expression nesting depth exceeds maximum of {} levels",
                    max_depth
                ),
                "P004",
                vec!["Reduce nesting or simplify the expression".to_string()],
            ),
            ParseErrorKind::InvalidLiteral { message } => (message.clone(), "P005", vec![]),
            ParseErrorKind::Other { message } => (message.clone(), "P999", vec![]),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.span.clone(),
            related: vec![],
            help,
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(f, "{}: {}", diagnostic.severity, diagnostic.message)?;

        if let Some(ref code) = diagnostic.code {
            write!(f, " [{}]", code)?;
        }

        for help_msg in &diagnostic.help {
            write!(f, "\nhelp: {}", help_msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError { positives, .. } => {
            if span.0.start >= source.len() {
                if let Some((delimiter, offset)) = find_unclosed_delimiter(source) {
                    return ParseError::new(
                        ParseErrorKind::UnclosedDelimiter { delimiter },
                        source,
                        Span::new(offset, offset + 1),
                    );
                }
            }
            ParseErrorKind::UnexpectedToken {
                expected: format_expected_rules(&positives),
                found: describe_found(source, span.0.start),
            }
        }
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, source, span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts: Vec<&str> = Vec::new();
    let mut push = |concept| {
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    };

    for rule in rules {
        match rule {
            Rule::integer
            | Rule::float
            | Rule::imaginary
            | Rule::string
            | Rule::string_piece
            | Rule::ellipsis => push("literal"),
            Rule::ident => push("identifier"),
            Rule::EOI => push("end of input"),
            Rule::kw_else => push("'else'"),
            Rule::kw_in => push("'in'"),
            Rule::kw_for => push("'for'"),
            Rule::dict_value => push("':'"),
            Rule::or_op
            | Rule::and_op
            | Rule::not_in
            | Rule::is_not
            | Rule::in_op
            | Rule::is_op
            | Rule::eq
            | Rule::ne
            | Rule::le
            | Rule::lt
            | Rule::ge
            | Rule::gt
            | Rule::bit_or
            | Rule::bit_xor
            | Rule::bit_and
            | Rule::lshift
            | Rule::rshift
            | Rule::add
            | Rule::sub
            | Rule::pow
            | Rule::mul
            | Rule::matmul
            | Rule::floordiv
            | Rule::div
            | Rule::modulo
            | Rule::call_op
            | Rule::index_op
            | Rule::attr_op => push("operator"),
            _ => push("expression"),
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Describe the text at `pos` for an "expected X, found Y" message.
fn describe_found(source: &str, pos: usize) -> String {
    let rest = source.get(pos..).unwrap_or("");
    let Some(first) = rest.chars().next() else {
        return "end of input".to_string();
    };
    if first.is_alphanumeric() || first == '_' {
        let word: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        format!("'{}'", word)
    } else if first.is_whitespace() {
        "whitespace".to_string()
    } else {
        format!("'{}'", first)
    }
}

/// Find the innermost opening bracket that is never closed, skipping string
/// literals and comments.
fn find_unclosed_delimiter(source: &str) -> Option<(char, usize)> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '(' | '[' | '{' => stack.push((ch, pos)),
            ')' | ']' | '}' => {
                let expected_open = match ch {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.last() {
                    Some((open, _)) if *open == expected_open => {
                        stack.pop();
                    }
                    // Mismatched closer: not an "unclosed" problem.
                    _ => return None,
                }
            }
            '#' => {
                while let Some((_, c)) = chars.peek() {
                    if *c == '\n' || *c == '\r' {
                        break;
                    }
                    chars.next();
                }
            }
            '\'' | '"' => {
                let triple = source[pos..].starts_with(&format!("{ch}{ch}{ch}"));
                if triple {
                    chars.next();
                    chars.next();
                }
                let mut closed = false;
                while let Some((i, c)) = chars.next() {
                    if c == '\\' {
                        chars.next();
                    } else if c == ch
                        && (!triple || source[i..].starts_with(&format!("{ch}{ch}{ch}")))
                    {
                        if triple {
                            chars.next();
                            chars.next();
                        }
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return None;
                }
            }
            _ => {}
        }
    }

    stack.last().copied()
}
