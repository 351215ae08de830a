//! Configuration options for evaluation.

use crate::parser::DEFAULT_MAX_PARSE_DEPTH;

/// Configuration options for [`DataEval`](super::DataEval).
///
/// # Example
///
/// ```
/// use dataeval_core::api::EvalOptions;
///
/// let options = EvalOptions { max_depth: 64 };
/// assert_eq!(EvalOptions::default().max_depth, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOptions {
    /// Maximum nesting depth of the syntax tree (for recursion protection).
    ///
    /// Default: 500
    pub max_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_PARSE_DEPTH,
        }
    }
}
