//! Safe evaluation of Python-style data literals.
//!
//! [`data_eval`] turns the text of one literal expression (`None`, booleans,
//! numbers, strings, bytes, tuples, lists, sets, dicts and the
//! `datetime.datetime(...)`/`datetime.timedelta(...)` constructors) into a
//! [`Value`]. Anything else is rejected, either as a syntax error or as an
//! unsafe construct. [`encode`] is the inverse.

pub mod api;
pub mod evaluator;
pub mod fields;
pub mod parser;
pub mod syntax;
pub mod values;

pub use api::{DataEval, EvalOptions, Source, data_eval};
pub use evaluator::{DataEvalError, ErrorKind};
pub use fields::{DictData, DictField, FieldError};
pub use values::{EncodeError, Mapping, Value, encode, to_pretty_string};
