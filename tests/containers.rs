#[macro_use]
mod cases;

use cases::{PREFERENCES, mapping};
use dataeval::{Value, data_eval, encode};
use pretty_assertions::assert_eq;

test_case!(
    empty_containers,
    input: "((), [], {}, set())",
    error: dataeval::ErrorKind::Unsafe,
);
// `set()` is a call, not a display.

test_case!(
    empty_displays,
    input: "((), [], {})",
    value: Value::Tuple(vec![
        Value::Tuple(vec![]),
        Value::List(vec![]),
        Value::Dict(Default::default()),
    ]),
    encoded: "((), [], {})",
);

test_case!(
    single_tuple,
    input: "(1,)",
    value: Value::Tuple(vec![Value::Int(1)]),
    encoded: "(1,)",
);

test_case!(
    bare_tuple,
    input: "1, 'two',",
    value: Value::Tuple(vec![Value::Int(1), Value::from("two")]),
    encoded: "(1, 'two')",
);

test_case!(
    signed_list,
    input: "[1, 2, -3, -4.41]",
    value: Value::List(vec![
        Value::Int(1),
        Value::Int(2),
        Value::Int(-3),
        Value::Float(-4.41),
    ]),
    encoded: "[1, 2, -3, -4.41]",
);

test_case!(
    set_is_sorted_and_deduplicated,
    input: "{'b', 2, 'a', 2}",
    encoded: "{2, 'a', 'b'}",
);

test_case!(
    dict_last_key_wins,
    input: "{'x': 1, 'x': 2}",
    value: Value::Dict(mapping([(Value::from("x"), Value::Int(2))])),
    encoded: "{'x': 2}",
);

test_case!(
    numbers_of_different_types_are_distinct_keys,
    input: "{1: 'int', 1.0: 'float', True: 'bool'}",
    encoded: "{True: 'bool', 1: 'int', 1.0: 'float'}",
);

test_case!(
    same_type_duplicates_still_collapse,
    input: "{1: 'a', 1.0: 'b', True: 'c', 1: 'd'}",
    value: Value::Dict(mapping([
        (Value::Bool(true), Value::from("c")),
        (Value::Int(1), Value::from("d")),
        (Value::Float(1.0), Value::from("b")),
    ])),
    encoded: "{True: 'c', 1: 'd', 1.0: 'b'}",
);

test_case!(
    numbers_of_different_types_are_distinct_members,
    input: "{1, 1.0, True, 1}",
    encoded: "{True, 1, 1.0}",
);

test_case!(
    nested,
    input: "{'list': [(1, 2), {3}], 'dict': {'inner': None}}",
    encoded: "{'dict': {'inner': None}, 'list': [(1, 2), {3}]}",
);

test_case!(
    preferences_mapping,
    input: "{1: 2, 'a': 'b', 'd': -1, 'e': -2.02}",
    value: Value::Dict(PREFERENCES.clone()),
    encoded: "{1: 2, 'a': 'b', 'd': -1, 'e': -2.02}",
);

#[test]
fn test_line_endings() {
    let expected = Value::Dict(PREFERENCES.clone());
    for separator in ["\n", "\r\n", "\r"] {
        let source = ["{1: 2,", "'a': 'b',", "'d': -1,", "'e': -2.02}"].join(separator);
        assert_eq!(data_eval(source.as_str()).unwrap(), expected, "{source:?}");
    }
}

#[test]
fn test_comments_and_indentation() {
    let source = indoc::indoc! {"
        # stored preferences
        {
            1: 2,        # first
            'a': 'b',
            'd': -1,
            'e': -2.02,  # trailing comma is fine
        }
    "};
    assert_eq!(
        data_eval(source).unwrap(),
        Value::Dict(PREFERENCES.clone())
    );
}

#[test]
fn test_mapping_passes_through() {
    let foo_bar = mapping([(Value::from("foo"), Value::from("bar"))]);
    assert_eq!(
        data_eval(foo_bar.clone()).unwrap(),
        Value::Dict(foo_bar)
    );
}

#[test]
fn test_round_trip_preferences() {
    let value = Value::Dict(PREFERENCES.clone());
    let text = encode(&value).unwrap();
    assert_eq!(data_eval(text).unwrap(), value);
}
