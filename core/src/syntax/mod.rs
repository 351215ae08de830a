//! Literal codecs shared by the parser (source text to runtime values) and
//! the encoder (runtime values back to source text).

pub mod bytes_literal;
pub mod string_literal;

pub use string_literal::UnescapeError;
