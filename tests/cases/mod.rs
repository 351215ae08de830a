//! Shared helpers for the integration tests.
//!
//! `test_case!` generates one `#[test]` per input. The forms are:
//!
//! - `value:` and `encoded:`: the input evaluates to `value`, whose canonical
//!   encoding is `encoded`, and the encoding evaluates back to `value`.
//! - `encoded:` alone: same, without spelling out the value.
//! - `error:`: evaluation fails with an error whose kind matches the pattern.

#![allow(dead_code)]

use dataeval::{Mapping, Value};
use once_cell::sync::Lazy;

macro_rules! test_case {
    ($name:ident, input: $input:expr, value: $value:expr, encoded: $encoded:expr $(,)?) => {
        #[test]
        fn $name() {
            let value = $crate::cases::eval_ok($input);
            pretty_assertions::assert_eq!(value, $value);
            $crate::cases::check_encoding(&value, $encoded);
        }
    };
    ($name:ident, input: $input:expr, encoded: $encoded:expr $(,)?) => {
        #[test]
        fn $name() {
            let value = $crate::cases::eval_ok($input);
            $crate::cases::check_encoding(&value, $encoded);
        }
    };
    ($name:ident, input: $input:expr, error: $kind:pat $(,)?) => {
        #[test]
        fn $name() {
            match dataeval::data_eval($input) {
                Ok(value) => panic!("expected an error for {:?}, got {}", $input, value),
                Err(err) => assert!(
                    matches!(err.kind(), $kind),
                    "unexpected {:?} for {:?}: {}",
                    err.kind(),
                    $input,
                    err
                ),
            }
        }
    };
}

pub fn eval_ok(input: &str) -> Value {
    dataeval::data_eval(input).unwrap_or_else(|e| panic!("evaluating {:?} failed: {}", input, e))
}

pub fn check_encoding(value: &Value, expected: &str) {
    let encoded = dataeval::encode(value).unwrap();
    pretty_assertions::assert_eq!(encoded, expected);
    pretty_assertions::assert_eq!(&eval_ok(&encoded), value);
}

pub fn mapping<const N: usize>(entries: [(Value, Value); N]) -> Mapping {
    entries.into_iter().collect()
}

/// The preferences mapping used across the container tests.
pub static PREFERENCES: Lazy<Mapping> = Lazy::new(|| {
    mapping([
        (Value::Int(1), Value::Int(2)),
        (Value::from("a"), Value::from("b")),
        (Value::from("d"), Value::Int(-1)),
        (Value::from("e"), Value::Float(-2.02)),
    ])
});
