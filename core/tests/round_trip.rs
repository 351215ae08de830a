//! Encoding a value and evaluating the text gives the value back.

use chrono::{NaiveDate, TimeDelta};
use dataeval_core::{Mapping, Value, data_eval, encode, to_pretty_string};
use pretty_assertions::assert_eq;

fn samples() -> Vec<Value> {
    let datetime = NaiveDate::from_ymd_opt(2015, 3, 4)
        .unwrap()
        .and_hms_micro_opt(12, 30, 1, 250)
        .unwrap();

    let mut mapping = Mapping::new();
    mapping.insert(Value::Int(1), Value::Int(2));
    mapping.insert(Value::from("a"), Value::from("b"));
    mapping.insert(Value::from("d"), Value::Int(-1));
    mapping.insert(Value::from("e"), Value::Float(-2.02));

    let mut nested = Mapping::new();
    nested.insert(
        Value::Tuple(vec![Value::Int(1), Value::from("x")]),
        Value::List(vec![Value::None, Value::Bool(true), Value::Bool(false)]),
    );
    nested.insert(Value::from("mapping"), Value::Dict(mapping.clone()));
    nested.insert(
        Value::from("set"),
        Value::Set([Value::Int(3), Value::from("s")].into_iter().collect()),
    );

    vec![
        Value::None,
        Value::Bool(true),
        Value::Int(0),
        Value::Int(-1),
        Value::Int(i64::MAX),
        Value::Int(i64::MIN),
        Value::Float(-2.02),
        Value::Float(0.1),
        Value::Float(-0.0),
        Value::Float(1e16),
        Value::Float(1.5e-7),
        Value::Float(f64::MAX),
        Value::Float(5e-324),
        Value::from(""),
        Value::from("it's \"quoted\"\n\t\\"),
        Value::from("unicode: \u{e9}\u{2028}\u{1f30d}\u{0}"),
        Value::Bytes((0u8..=255).collect()),
        Value::Tuple(vec![]),
        Value::Tuple(vec![Value::Int(1)]),
        Value::List(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(-3),
            Value::Float(-4.41),
        ]),
        Value::Dict(mapping),
        Value::Dict(nested),
        Value::DateTime(datetime),
        Value::TimeDelta(TimeDelta::microseconds(-1)),
        Value::TimeDelta(TimeDelta::days(999_999_999)),
        Value::TimeDelta(TimeDelta::days(-999_999_999)),
    ]
}

#[test]
fn test_canonical_round_trip() {
    for value in samples() {
        let text = encode(&value).unwrap();
        assert_eq!(data_eval(text.as_str()).unwrap(), value, "{text}");
    }
}

#[test]
fn test_pretty_round_trip() {
    for value in samples() {
        for width in [1, 20, 80] {
            let text = to_pretty_string(&value, width);
            assert_eq!(data_eval(text.as_str()).unwrap(), value, "{text}");
        }
    }
}

#[test]
fn test_canonical_mapping_text() {
    let value = data_eval("{'e': -2.02, 'd': -1, 'a': 'b', 1: 2}").unwrap();
    assert_eq!(
        encode(&value).unwrap(),
        "{1: 2, 'a': 'b', 'd': -1, 'e': -2.02}"
    );
}
