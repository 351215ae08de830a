//! The two constructors a data expression may call.
//!
//! `datetime.datetime(...)` and `datetime.timedelta(...)` take positional
//! numbers only and follow the argument rules of Python's `datetime` module.

use chrono::{NaiveDate, TimeDelta};

use crate::values::Value;
use crate::values::display::{MAX_DELTA_DAYS, MICROS_PER_DAY, MICROS_PER_SECOND};

/// Builds a value from already converted positional arguments. The error is
/// a message for [`ConversionKind::InvalidArguments`](super::ConversionKind).
pub type ConstructorFn = fn(&[Value]) -> Result<Value, String>;

/// Constructor table, keyed by lowercased attribute name.
pub const CONSTRUCTORS: &[(&str, ConstructorFn)] =
    &[("datetime", datetime), ("timedelta", timedelta)];

/// Find the constructor for a call's attribute name, ignoring case.
pub fn lookup(attr: &str) -> Option<(&'static str, ConstructorFn)> {
    let name = attr.to_lowercase();
    CONSTRUCTORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .copied()
}

const DATETIME_FIELDS: [&str; 7] = [
    "year",
    "month",
    "day",
    "hour",
    "minute",
    "second",
    "microsecond",
];

fn integer_argument(value: &Value) -> Result<i64, String> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Float(_) => Err("integer argument expected, got float".to_string()),
        other => Err(format!(
            "'{}' object cannot be interpreted as an integer",
            other.type_name()
        )),
    }
}

/// `datetime(year, month, day[, hour[, minute[, second[, microsecond]]]])`
pub fn datetime(args: &[Value]) -> Result<Value, String> {
    if args.len() < 3 {
        return Err(format!(
            "missing required argument '{}' (pos {})",
            DATETIME_FIELDS[args.len()],
            args.len() + 1
        ));
    }
    if args.len() > DATETIME_FIELDS.len() {
        return Err(format!(
            "takes at most {} arguments ({} given)",
            DATETIME_FIELDS.len(),
            args.len()
        ));
    }

    let mut fields = [0i64; 7];
    for (field, arg) in fields.iter_mut().zip(args) {
        *field = integer_argument(arg)?;
    }
    let [year, month, day, hour, minute, second, microsecond] = fields;

    if !(1..=9999).contains(&year) {
        return Err(format!("year {} is out of range", year));
    }
    if !(1..=12).contains(&month) {
        return Err("month must be in 1..12".to_string());
    }
    let checks = [
        (hour, 23, "hour must be in 0..23"),
        (minute, 59, "minute must be in 0..59"),
        (second, 59, "second must be in 0..59"),
        (microsecond, 999_999, "microsecond must be in 0..999999"),
    ];
    for (value, max, message) in checks {
        if !(0..=max).contains(&value) {
            return Err(message.to_string());
        }
    }

    let day_out_of_range = || "day is out of range for month".to_string();
    if !(1..=31).contains(&day) {
        return Err(day_out_of_range());
    }

    // All fields are range checked, so the narrowing casts are exact.
    let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .ok_or_else(day_out_of_range)?;
    date.and_hms_micro_opt(hour as u32, minute as u32, second as u32, microsecond as u32)
        .map(Value::DateTime)
        .ok_or_else(|| "time is out of range".to_string())
}

const FLOAT_LIMIT: f64 = 1e35;

/// Positional `timedelta` components and their length in microseconds.
const TIMEDELTA_FIELDS: [(&str, i128); 7] = [
    ("days", MICROS_PER_DAY),
    ("seconds", MICROS_PER_SECOND),
    ("microseconds", 1),
    ("milliseconds", 1_000),
    ("minutes", 60 * MICROS_PER_SECOND),
    ("hours", 3_600 * MICROS_PER_SECOND),
    ("weeks", 7 * MICROS_PER_DAY),
];

/// `timedelta([days[, seconds[, microseconds[, milliseconds[, minutes[, hours[, weeks]]]]]]])`
///
/// Integer components are summed exactly; float components are summed
/// separately and rounded half to even to whole microseconds.
pub fn timedelta(args: &[Value]) -> Result<Value, String> {
    if args.len() > TIMEDELTA_FIELDS.len() {
        return Err(format!(
            "takes at most {} arguments ({} given)",
            TIMEDELTA_FIELDS.len(),
            args.len()
        ));
    }

    let mut exact: i128 = 0;
    let mut fractional: f64 = 0.0;
    for (&(name, micros), arg) in TIMEDELTA_FIELDS.iter().zip(args) {
        match arg {
            Value::Int(i) => exact += i128::from(*i) * micros,
            Value::Bool(b) => exact += i128::from(*b) * micros,
            Value::Float(f) => fractional += f * micros as f64,
            other => {
                return Err(format!(
                    "unsupported type for timedelta {} component: {}",
                    name,
                    other.type_name()
                ));
            }
        }
    }

    let out_of_range = |days: String| format!("days={}; must have magnitude <= 999999999", days);

    if !fractional.is_finite() {
        return Err(format!("cannot convert float {} to integer", fractional));
    }
    // Far beyond any valid total, and small enough that the i128 sum below
    // cannot overflow.
    if fractional.abs() > FLOAT_LIMIT {
        let days = (fractional / MICROS_PER_DAY as f64).floor();
        return Err(out_of_range(format!("{:.0}", days)));
    }
    let total = exact + fractional.round_ties_even() as i128;

    let days = total.div_euclid(MICROS_PER_DAY);
    if days.abs() > MAX_DELTA_DAYS {
        return Err(out_of_range(days.to_string()));
    }

    let seconds = total.div_euclid(MICROS_PER_SECOND) as i64;
    let nanos = (total.rem_euclid(MICROS_PER_SECOND) * 1_000) as u32;
    TimeDelta::new(seconds, nanos)
        .map(Value::TimeDelta)
        .ok_or_else(|| out_of_range(days.to_string()))
}
