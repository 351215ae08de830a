//! Canonical text encoding of values.
//!
//! `Display` renders a value the way the evaluator reads it back: Python
//! literal syntax, with `datetime.datetime(...)` and `datetime.timedelta(...)`
//! constructor calls for time values. [`encode`] adds the checks that make the
//! output round-trip.

use core::fmt::{self, Write};

use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use thiserror::Error;

use crate::syntax::{bytes_literal::escape_bytes, string_literal::escape_string};
use crate::values::Value;

pub(crate) const MICROS_PER_SECOND: i128 = 1_000_000;
pub(crate) const MICROS_PER_DAY: i128 = 86_400 * MICROS_PER_SECOND;
pub(crate) const MAX_DELTA_DAYS: i128 = 999_999_999;

/// A value the canonical encoding cannot express.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("cannot encode non-finite float {0}")]
    NonFiniteFloat(f64),
    #[error("cannot encode an empty set: `set()` is not a literal")]
    EmptySet,
    #[error("cannot encode datetime with year {year}: year must be in 1..9999")]
    DateTimeOutOfRange { year: i32 },
    #[error("cannot encode {value}: precision finer than a microsecond")]
    SubMicrosecond { value: String },
    #[error("cannot encode timedelta of {days} days: magnitude must be <= 999999999")]
    TimeDeltaOutOfRange { days: i128 },
}

/// Encode a value as text that evaluates back to an equal value.
///
/// # Example
///
/// ```ignore
/// let value = data_eval("{'a': [1, -2.5]}").unwrap();
/// assert_eq!(encode(&value).unwrap(), "{'a': [1, -2.5]}");
/// ```
pub fn encode(value: &Value) -> Result<String, EncodeError> {
    check_encodable(value)?;
    Ok(value.to_string())
}

fn check_encodable(value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(EncodeError::NonFiniteFloat(*f)),
        Value::Set(items) if items.is_empty() => Err(EncodeError::EmptySet),
        Value::Set(items) => items.iter().try_for_each(check_encodable),
        Value::Tuple(items) | Value::List(items) => items.iter().try_for_each(check_encodable),
        Value::Dict(mapping) => mapping.iter().try_for_each(|(key, value)| {
            check_encodable(key)?;
            check_encodable(value)
        }),
        Value::DateTime(dt) => {
            if !(1..=9999).contains(&dt.year()) {
                return Err(EncodeError::DateTimeOutOfRange { year: dt.year() });
            }
            if dt.nanosecond() % 1000 != 0 || dt.nanosecond() >= 1_000_000_000 {
                return Err(EncodeError::SubMicrosecond {
                    value: value.to_string(),
                });
            }
            Ok(())
        }
        Value::TimeDelta(delta) => {
            if delta.subsec_nanos() % 1000 != 0 {
                return Err(EncodeError::SubMicrosecond {
                    value: value.to_string(),
                });
            }
            let (days, _, _) = delta_parts(delta);
            if days.abs() > MAX_DELTA_DAYS {
                return Err(EncodeError::TimeDeltaOutOfRange { days });
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Splits a duration into Python's normalized `(days, seconds, microseconds)`
/// with `0 <= seconds < 86400` and `0 <= microseconds < 1000000`.
pub(crate) fn delta_parts(delta: &TimeDelta) -> (i128, i128, i128) {
    let micros = i128::from(delta.num_seconds()) * MICROS_PER_SECOND
        + i128::from(delta.subsec_nanos() / 1000);
    let days = micros.div_euclid(MICROS_PER_DAY);
    let rest = micros.rem_euclid(MICROS_PER_DAY);
    (days, rest / MICROS_PER_SECOND, rest % MICROS_PER_SECOND)
}

/// Writes a float the way Python's `repr` does: the shortest digits that
/// read back to the same float, positional for exponents in `-4 < e <= 16`,
/// scientific otherwise, and always marked as a float.
pub(crate) fn write_float(f: &mut impl Write, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("nan");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let decimal_point = exponent + 1;

    if -4 < decimal_point && decimal_point <= 16 {
        let positional = format!("{}", value);
        f.write_str(&positional)?;
        if !positional.contains('.') {
            f.write_str(".0")?;
        }
        Ok(())
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

fn write_datetime(f: &mut impl Write, dt: &NaiveDateTime) -> fmt::Result {
    write!(
        f,
        "datetime.datetime({}, {}, {}, {}, {}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute()
    )?;
    let micros = dt.nanosecond() / 1000;
    if dt.second() != 0 || micros != 0 {
        write!(f, ", {}", dt.second())?;
    }
    if micros != 0 {
        write!(f, ", {}", micros)?;
    }
    f.write_char(')')
}

fn write_timedelta(f: &mut impl Write, delta: &TimeDelta) -> fmt::Result {
    let (days, seconds, micros) = delta_parts(delta);
    write!(f, "datetime.timedelta({}", days)?;
    if seconds != 0 || micros != 0 {
        write!(f, ", {}", seconds)?;
    }
    if micros != 0 {
        write!(f, ", {}", micros)?;
    }
    f.write_char(')')
}

fn write_items<'v>(
    f: &mut fmt::Formatter<'_>,
    items: impl Iterator<Item = &'v Value>,
) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write_float(f, *value),
            Value::Str(s) => escape_string(f, s),
            Value::Bytes(bytes) => escape_bytes(f, bytes),
            Value::Tuple(items) => {
                f.write_char('(')?;
                write_items(f, items.iter())?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Value::List(items) => {
                f.write_char('[')?;
                write_items(f, items.iter())?;
                f.write_char(']')
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_char('{')?;
                write_items(f, items.iter())?;
                f.write_char('}')
            }
            Value::Dict(mapping) => {
                f.write_char('{')?;
                for (i, (key, value)) in mapping.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_char('}')
            }
            Value::DateTime(dt) => write_datetime(f, dt),
            Value::TimeDelta(delta) => write_timedelta(f, delta),
        }
    }
}
