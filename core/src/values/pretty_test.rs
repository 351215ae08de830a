use indoc::indoc;

use crate::values::{Mapping, Value, to_pretty_string};

fn ints(range: core::ops::Range<i64>) -> Vec<Value> {
    range.map(Value::Int).collect()
}

#[test]
fn test_short_values_stay_on_one_line() {
    let value = Value::List(ints(0..5));
    assert_eq!(to_pretty_string(&value, 80), "[0, 1, 2, 3, 4]");
    assert_eq!(to_pretty_string(&Value::List(vec![]), 1), "[]");
    assert_eq!(to_pretty_string(&Value::from("scalar"), 1), "'scalar'");
}

#[test]
fn test_long_list_breaks_one_item_per_line() {
    let value = Value::List(ints(0..4));
    assert_eq!(
        to_pretty_string(&value, 10),
        indoc! {"
            [0,
             1,
             2,
             3]"}
    );
}

#[test]
fn test_single_tuple_keeps_trailing_comma() {
    let value = Value::Tuple(vec![Value::from("a long string value")]);
    assert_eq!(to_pretty_string(&value, 10), "('a long string value',)");
}

#[test]
fn test_dict_values_continue_after_key() {
    let mut inner = Mapping::new();
    inner.insert(Value::from("x"), Value::List(ints(0..3)));
    let mut outer = Mapping::new();
    outer.insert(Value::from("first"), Value::Dict(inner));
    outer.insert(Value::from("second"), Value::Int(2));

    assert_eq!(
        to_pretty_string(&Value::Dict(outer), 20),
        indoc! {"
            {'first': {'x': [0,
                             1,
                             2]},
             'second': 2}"}
    );
}

#[test]
fn test_nested_lists() {
    let value = Value::List(vec![Value::List(ints(0..3)), Value::List(ints(3..6))]);
    assert_eq!(
        to_pretty_string(&value, 12),
        indoc! {"
            [[0, 1, 2],
             [3, 4, 5]]"}
    );
}
