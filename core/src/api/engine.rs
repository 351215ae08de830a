//! The evaluation entry points.

use std::borrow::Cow;

use bumpalo::Bump;

use super::EvalOptions;
use crate::{
    evaluator::{self, DataEvalError},
    parser,
    values::{Mapping, Value},
};

/// Input accepted by [`data_eval`]: expression text, or a value that is
/// already structured.
#[derive(Debug, Clone, PartialEq)]
pub enum Source<'s> {
    Text(Cow<'s, str>),
    Data(Value),
}

impl<'s> From<&'s str> for Source<'s> {
    fn from(text: &'s str) -> Self {
        Source::Text(Cow::Borrowed(text))
    }
}

impl<'s> From<&'s String> for Source<'s> {
    fn from(text: &'s String) -> Self {
        Source::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for Source<'_> {
    fn from(text: String) -> Self {
        Source::Text(Cow::Owned(text))
    }
}

impl From<Value> for Source<'_> {
    fn from(value: Value) -> Self {
        Source::Data(value)
    }
}

impl From<Mapping> for Source<'_> {
    fn from(mapping: Mapping) -> Self {
        Source::Data(Value::Dict(mapping))
    }
}

/// Evaluates data expressions with a fixed set of options.
///
/// The evaluator holds no state besides its options; every call allocates its
/// own arena for the syntax tree and drops it before returning.
///
/// # Example
///
/// ```
/// use dataeval_core::api::{DataEval, EvalOptions};
/// use dataeval_core::values::Value;
///
/// let eval = DataEval::new(EvalOptions::default());
/// assert_eq!(eval.parse("[1, -2]").unwrap().to_string(), "[1, -2]");
/// assert!(eval.parse("__import__('os')").unwrap_err().is_unsafe());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataEval {
    options: EvalOptions,
}

impl DataEval {
    pub fn new(options: EvalOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Evaluate `source` into a value.
    ///
    /// A mapping is returned unchanged; any other structured value is
    /// rejected before parsing.
    pub fn parse<'s>(&self, source: impl Into<Source<'s>>) -> Result<Value, DataEvalError> {
        match source.into() {
            Source::Data(value @ Value::Dict(_)) => Ok(value),
            Source::Data(other) => Err(DataEvalError::InvalidSource {
                type_name: other.type_name(),
            }),
            Source::Text(text) => self.parse_text(&text),
        }
    }

    fn parse_text(&self, text: &str) -> Result<Value, DataEvalError> {
        tracing::debug!(len = text.len(), "evaluating data expression");
        let arena = Bump::new();
        let parsed = parser::parse_with_max_depth(&arena, text, self.options.max_depth)?;
        evaluator::convert(parsed)
    }
}

/// Evaluate `source` with default options.
///
/// # Example
///
/// ```
/// use dataeval_core::api::data_eval;
///
/// let value = data_eval("{'a': 1, 'b': -2.5}").unwrap();
/// assert_eq!(value.to_string(), "{'a': 1, 'b': -2.5}");
/// assert!(data_eval("import os").unwrap_err().is_syntax());
/// ```
pub fn data_eval<'s>(source: impl Into<Source<'s>>) -> Result<Value, DataEvalError> {
    DataEval::default().parse(source)
}
