use std::collections::BTreeSet;

use chrono::TimeDelta;

use crate::values::{Mapping, Value};

#[test]
fn test_type_names() {
    assert_eq!(Value::None.type_name(), "NoneType");
    assert_eq!(Value::Int(1).type_name(), "int");
    assert_eq!(Value::Dict(Mapping::new()).type_name(), "dict");
    assert_eq!(Value::TimeDelta(TimeDelta::zero()).type_name(), "timedelta");
}

#[test]
fn test_equality_is_structural() {
    assert_eq!(
        Value::List(vec![Value::Int(1), Value::from("a")]),
        Value::List(vec![Value::Int(1), Value::from("a")])
    );
    assert_ne!(
        Value::List(vec![Value::Int(1)]),
        Value::Tuple(vec![Value::Int(1)])
    );
}

#[test]
fn test_numbers_of_different_types_are_distinct() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::Int(1), Value::Bool(true));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
}

#[test]
fn test_mapping_ignores_insertion_order() {
    let mut first = Mapping::new();
    first.insert(Value::from("b"), Value::Int(2));
    first.insert(Value::from("a"), Value::Int(1));

    let mut second = Mapping::new();
    second.insert(Value::from("a"), Value::Int(1));
    second.insert(Value::from("b"), Value::Int(2));

    assert_eq!(Value::Dict(first), Value::Dict(second));
}

#[test]
fn test_set_collapses_duplicates() {
    let set: BTreeSet<Value> = [Value::Int(1), Value::Int(1), Value::Int(2)]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_ordering_groups_by_variant() {
    let mut values = vec![
        Value::from("a"),
        Value::Float(0.5),
        Value::Int(3),
        Value::None,
        Value::Bool(false),
    ];
    values.sort();
    assert_eq!(
        values,
        vec![
            Value::None,
            Value::Bool(false),
            Value::Int(3),
            Value::Float(0.5),
            Value::from("a"),
        ]
    );
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Int(7).as_int(), Some(7));
    assert_eq!(Value::Float(7.5).as_float(), Some(7.5));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::Int(7).as_str(), None);
    assert!(Value::Dict(Mapping::new()).as_dict().is_some());
    assert_eq!(Value::Int(1).into_dict(), Err(Value::Int(1)));
}
