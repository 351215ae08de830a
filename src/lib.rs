//! dataeval - safe evaluation of Python-style data literals
//!
//! # Overview
//!
//! `dataeval` reads the text of a single literal expression, the kind of
//! text Python's `repr` produces for plain data, and turns it into a
//! [`Value`]. Only an allow-list of shapes is accepted:
//!
//! - `None`, `True`, `False` (in any letter case)
//! - integers, floats, strings and bytes, including signed numbers and
//!   `+`/`-` between numbers
//! - tuples, lists, sets and dicts of accepted values
//! - `datetime.datetime(...)` and `datetime.timedelta(...)` with positional
//!   arguments
//!
//! Everything else (names, other operators, arbitrary calls, attribute
//! access, comprehensions, ...) is rejected as unsafe. Text that is not a
//! single expression at all is rejected as a syntax error.
//!
//! # Quick Start
//!
//! ```
//! use dataeval::{Value, data_eval, encode};
//!
//! let value = data_eval("{'retries': 3, 'ratio': -0.5}").unwrap();
//! assert_eq!(encode(&value).unwrap(), "{'ratio': -0.5, 'retries': 3}");
//!
//! let err = data_eval("__import__('os').system('ls')").unwrap_err();
//! assert!(err.is_unsafe());
//! ```
//!
//! # Encoding
//!
//! [`encode`] produces canonical single-line text and refuses values that
//! could not be read back; [`to_pretty_string`] wraps long containers the way
//! Python's `pprint` does. Both forms evaluate back to an equal value.

pub use dataeval_core::{
    api::{DataEval, Diagnostic, EvalOptions, RelatedInfo, Severity, Source, data_eval},
    evaluator::{
        ConversionError, ConversionKind, DataEvalError, ErrorKind, UnsafeKind, UnsafeSourceError,
    },
    fields::{DictData, DictDataError, DictField, FieldError},
    parser::{ParseError, ParseErrorKind, Span},
    values::{DEFAULT_WIDTH, EncodeError, Mapping, Value, encode, to_pretty_string},
};

// Re-export modules for advanced usage
pub mod parser {
    pub use dataeval_core::parser::*;
}

pub mod values {
    pub use dataeval_core::values::*;
}

mod error_renderer;
pub use error_renderer::{
    RenderConfig, render_error, render_error_to, render_error_to_string,
    render_error_to_string_no_color, render_error_with,
};
