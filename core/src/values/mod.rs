pub mod display;
pub mod pretty;
pub mod value;

pub use display::{EncodeError, encode};
pub use pretty::{DEFAULT_WIDTH, to_pretty_string};
pub use value::{Mapping, Value};

#[cfg(test)]
mod pretty_test;
#[cfg(test)]
mod value_test;
