//! Public API for evaluating data expressions.
//!
//! # Example
//!
//! ```
//! use dataeval_core::api::{DataEval, EvalOptions, data_eval};
//!
//! let value = data_eval("datetime.timedelta(1, 30)").unwrap();
//! assert_eq!(value.to_string(), "datetime.timedelta(1, 30)");
//!
//! let shallow = DataEval::new(EvalOptions { max_depth: 4 });
//! assert!(shallow.parse("[[[[[[1]]]]]]").unwrap_err().is_syntax());
//! ```

pub mod engine;
pub mod error;
pub mod options;


pub use engine::{DataEval, Source, data_eval};
pub use error::{Diagnostic, RelatedInfo, Severity};
pub use options::EvalOptions;
