//! Errors raised while turning source text into a value.
//!
//! # Error Categories
//!
//! Every failure is a [`DataEvalError`]. Two of its variants are the
//! specific kinds callers usually want to tell apart:
//!
//! - **Syntax errors**: the text is not a single well-formed expression
//!   (statements, unbalanced brackets, malformed literals, nesting too deep).
//!
//! - **Unsafe errors**: the text parses, but contains a construct outside the
//!   allow-list (names, operators, calls, comprehensions, ...).
//!
//! The remaining variants are general evaluation errors: wrong input type,
//! unknown constructors, bad constructor arguments, integer overflow.

use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::{ParseError, Span};

/// The three classes of failure, most general first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// General evaluation error.
    Eval,
    /// The grammar rejected the text.
    Syntax,
    /// The text parsed but used a construct that is not allowed.
    Unsafe,
}

/// Any failure of [`data_eval`](crate::api::data_eval).
#[derive(Debug, Error)]
pub enum DataEvalError {
    /// The input was neither text nor a mapping.
    #[error("data_eval() argument must be a string or a mapping, not {type_name}")]
    InvalidSource { type_name: &'static str },

    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Unsafe(#[from] UnsafeSourceError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl DataEvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataEvalError::Syntax(_) => ErrorKind::Syntax,
            DataEvalError::Unsafe(_) => ErrorKind::Unsafe,
            DataEvalError::InvalidSource { .. } | DataEvalError::Conversion(_) => ErrorKind::Eval,
        }
    }

    pub fn is_syntax(&self) -> bool {
        self.kind() == ErrorKind::Syntax
    }

    pub fn is_unsafe(&self) -> bool {
        self.kind() == ErrorKind::Unsafe
    }

    /// The text that was being evaluated, if the error came from text.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            DataEvalError::InvalidSource { .. } => None,
            DataEvalError::Syntax(e) => Some(&e.source),
            DataEvalError::Unsafe(e) => Some(&e.src),
            DataEvalError::Conversion(e) => Some(&e.src),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            DataEvalError::InvalidSource { .. } => None,
            DataEvalError::Syntax(e) => Some(e.span.clone()),
            DataEvalError::Unsafe(e) => Some(e.span.clone()),
            DataEvalError::Conversion(e) => Some(e.span.clone()),
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DataEvalError::InvalidSource { .. } => Diagnostic {
                severity: Severity::Error,
                message: self.to_string(),
                span: Span::new(0, 0),
                related: vec![],
                help: vec![],
                code: Some("E000".to_string()),
            },
            DataEvalError::Syntax(e) => e.to_diagnostic(),
            DataEvalError::Unsafe(e) => e.to_diagnostic(),
            DataEvalError::Conversion(e) => e.to_diagnostic(),
        }
    }
}

/// A construct outside the allow-list.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct UnsafeSourceError {
    pub kind: UnsafeKind,
    pub src: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnsafeKind {
    /// A bare name other than `None`, `True` or `False` (any case).
    #[error("unsafe name '{name}': only None, True and False are allowed")]
    UnsupportedName { name: String },

    /// A syntax node the converter does not accept.
    #[error("unsafe expression `{snippet}`: {dump}")]
    MalformedNode { snippet: String, dump: String },

    /// A call whose callee is not an attribute access like `datetime.datetime`.
    #[error("unsafe call `{snippet}`: only datetime and timedelta constructors may be called")]
    NotAConstructor { snippet: String },

    /// A constructor call with keyword, `*` or `**` arguments.
    #[error("unsafe call `{snippet}`: constructor arguments must be positional")]
    KeywordArguments { snippet: String },
}

impl UnsafeSourceError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            UnsafeKind::UnsupportedName { .. } => (
                "U001",
                vec!["Quote the text if a string was intended".to_string()],
            ),
            UnsafeKind::MalformedNode { .. } => (
                "U002",
                vec![
                    "Only literals, containers, signed numbers and datetime/timedelta constructors are allowed"
                        .to_string(),
                ],
            ),
            UnsafeKind::NotAConstructor { .. } => (
                "U003",
                vec!["Use datetime.datetime(...) or datetime.timedelta(...)".to_string()],
            ),
            UnsafeKind::KeywordArguments { .. } => ("U004", vec![]),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: vec![],
            help,
            code: Some(code.to_string()),
        }
    }
}

/// A failure while building a value from an accepted construct.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ConversionError {
    pub kind: ConversionKind,
    pub src: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionKind {
    /// The attribute name of a call is not a known constructor.
    #[error("no conversion function for '{name}'")]
    UnknownConstructor { name: String },

    /// A constructor rejected its arguments.
    #[error("{constructor}(): {message}")]
    InvalidArguments {
        constructor: &'static str,
        message: String,
    },

    /// Sign or addition overflowed a 64-bit integer.
    #[error("integer overflow in `{snippet}`")]
    IntegerOverflow { snippet: String },
}

impl ConversionError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ConversionKind::UnknownConstructor { .. } => (
                "E001",
                vec!["Known constructors are datetime and timedelta".to_string()],
            ),
            ConversionKind::InvalidArguments { .. } => ("E002", vec![]),
            ConversionKind::IntegerOverflow { .. } => (
                "E003",
                vec!["Integers must fit in a signed 64-bit value".to_string()],
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: vec![],
            help,
            code: Some(code.to_string()),
        }
    }
}
