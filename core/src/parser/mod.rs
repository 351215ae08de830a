mod parsed_expr;
pub mod parser;
pub mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionParser;
pub use parser::Rule;
pub use parser::parse;
pub use parser::parse_with_max_depth;
pub use parser::DEFAULT_MAX_PARSE_DEPTH;

pub use parsed_expr::{ComprehensionClause, ComprehensionKind, Expr, Keyword, Literal, ParsedExpr};
pub use syntax::AnnotatedSource;
pub use syntax::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};
pub use error::{ParseError, ParseErrorKind};




#[cfg(test)]
mod precedence_test;
