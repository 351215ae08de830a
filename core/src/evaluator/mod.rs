//! Allow-list converter from syntax trees to values.
//!
//! The converter walks a [`ParsedExpr`](crate::parser::ParsedExpr) produced by
//! the parser and builds a [`Value`](crate::values::Value). Only literals,
//! containers, signed numbers, the names `None`/`True`/`False` and the two
//! `datetime` constructors are accepted; every other node is rejected as
//! unsafe.
//!
//! ## Example
//!
//! ```ignore
//! use dataeval_core::{evaluator, parser};
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let parsed = parser::parse(&arena, "{'a': -1}").unwrap();
//! let value = evaluator::convert(parsed).unwrap();
//! ```

pub mod constructors;
mod error;
mod eval;

#[cfg(test)]
mod eval_test;

pub use error::{
    ConversionError, ConversionKind, DataEvalError, ErrorKind, UnsafeKind, UnsafeSourceError,
};
pub use eval::{Converter, convert};
