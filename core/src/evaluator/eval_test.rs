//! Unit tests for the converter.

use bumpalo::Bump;
use chrono::{NaiveDate, TimeDelta};

use super::*;
use crate::{
    parser,
    values::{Mapping, Value},
};

fn eval(source: &str) -> Result<Value, DataEvalError> {
    let arena = Bump::new();
    let parsed = parser::parse(&arena, source)?;
    convert(parsed)
}

fn eval_ok(source: &str) -> Value {
    match eval(source) {
        Ok(value) => value,
        Err(e) => panic!("evaluating {:?} failed: {}", source, e),
    }
}

fn unsafe_kind(source: &str) -> UnsafeKind {
    match eval(source) {
        Err(DataEvalError::Unsafe(e)) => e.kind,
        other => panic!("expected unsafe error for {:?}, got {:?}", source, other),
    }
}

fn conversion_kind(source: &str) -> ConversionKind {
    match eval(source) {
        Err(DataEvalError::Conversion(e)) => e.kind,
        other => panic!("expected conversion error for {:?}, got {:?}", source, other),
    }
}

fn dict(entries: Vec<(Value, Value)>) -> Value {
    Value::Dict(entries.into_iter().collect())
}

#[test]
fn test_name_constants_ignore_case() {
    for source in ["true", "TRUE", "True", "tRuE"] {
        assert_eq!(eval_ok(source), Value::Bool(true), "{source}");
    }
    for source in ["false", "FALSE", "False"] {
        assert_eq!(eval_ok(source), Value::Bool(false), "{source}");
    }
    for source in ["none", "NONE", "None"] {
        assert_eq!(eval_ok(source), Value::None, "{source}");
    }
}

#[test]
fn test_literals() {
    assert_eq!(eval_ok("42"), Value::Int(42));
    assert_eq!(eval_ok("2.5"), Value::Float(2.5));
    assert_eq!(eval_ok("'abc'"), Value::from("abc"));
    assert_eq!(eval_ok("'a' 'b'"), Value::from("ab"));
    assert_eq!(eval_ok("b'\\x00z'"), Value::Bytes(vec![0, b'z']));
}

#[test]
fn test_signed_numbers() {
    assert_eq!(eval_ok("-1"), Value::Int(-1));
    assert_eq!(eval_ok("+1"), Value::Int(1));
    assert_eq!(eval_ok("--1"), Value::Int(1));
    assert_eq!(eval_ok("-2.02"), Value::Float(-2.02));
    assert_eq!(eval_ok("-(3)"), Value::Int(-3));
}

#[test]
fn test_add_and_sub() {
    assert_eq!(eval_ok("1 + 2"), Value::Int(3));
    assert_eq!(eval_ok("1 - 2 - 3"), Value::Int(-4));
    assert_eq!(eval_ok("1 + 0.5"), Value::Float(1.5));
    assert_eq!(eval_ok("-9223372036854775807 - 1"), Value::Int(i64::MIN));
}

#[test]
fn test_integer_extremes() {
    assert_eq!(eval_ok("-9223372036854775808"), Value::Int(i64::MIN));
    assert_eq!(eval_ok("9223372036854775807"), Value::Int(i64::MAX));
    assert_eq!(eval_ok("[-9223372036854775808]"), Value::List(vec![Value::Int(i64::MIN)]));
    // Only the folded result has to fit.
    assert_eq!(eval_ok("9223372036854775808 - 1"), Value::Int(i64::MAX));
}

#[test]
fn test_integer_overflow() {
    assert!(matches!(
        conversion_kind("9223372036854775807 + 1"),
        ConversionKind::IntegerOverflow { .. }
    ));
    assert!(matches!(
        conversion_kind("-(-9223372036854775807 - 1)"),
        ConversionKind::IntegerOverflow { .. }
    ));
    assert_eq!(
        conversion_kind("9223372036854775808"),
        ConversionKind::IntegerOverflow {
            snippet: "9223372036854775808".to_string()
        }
    );
    assert_eq!(
        conversion_kind("[1, -99999999999999999999]"),
        ConversionKind::IntegerOverflow {
            snippet: "99999999999999999999".to_string()
        }
    );
    assert!(matches!(
        eval("9223372036854775808").unwrap_err().kind(),
        ErrorKind::Eval
    ));
}

#[test]
fn test_containers() {
    assert_eq!(eval_ok("()"), Value::Tuple(vec![]));
    assert_eq!(eval_ok("[]"), Value::List(vec![]));
    assert_eq!(eval_ok("{}"), Value::Dict(Mapping::new()));
    assert_eq!(eval_ok("1, 2"), Value::Tuple(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(
        eval_ok("[1, 2, -3, -4.41]"),
        Value::List(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(-3),
            Value::Float(-4.41),
        ])
    );
    assert_eq!(
        eval_ok("{3, 1, 3}"),
        Value::Set([Value::Int(1), Value::Int(3)].into_iter().collect())
    );
    assert_eq!(
        eval_ok("[(1,), [], {'k': {None}}]"),
        Value::List(vec![
            Value::Tuple(vec![Value::Int(1)]),
            Value::List(vec![]),
            dict(vec![(
                Value::from("k"),
                Value::Set([Value::None].into_iter().collect())
            )]),
        ])
    );
}

#[test]
fn test_dict_last_key_wins() {
    assert_eq!(
        eval_ok("{'a': 1, 'b': 2, 'a': 3}"),
        dict(vec![
            (Value::from("a"), Value::Int(3)),
            (Value::from("b"), Value::Int(2)),
        ])
    );
}

#[test]
fn test_line_endings() {
    let expected = dict(vec![
        (Value::from("a"), Value::Int(1)),
        (Value::from("b"), Value::Int(2)),
    ]);
    assert_eq!(eval_ok("{\r\n'a': 1,\r\n'b': 2\r\n}"), expected);
    assert_eq!(eval_ok("{\r'a': 1,\r'b': 2\r}"), expected);
    assert_eq!(eval_ok("{\n'a': 1,  # first\n'b': 2\n}"), expected);
}

#[test]
fn test_constructors() {
    let expected = NaiveDate::from_ymd_opt(2015, 3, 4)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    assert_eq!(
        eval_ok("datetime.datetime(2015, 3, 4, 12, 30)"),
        Value::DateTime(expected)
    );
    // Only the attribute name is looked up, in any case.
    assert_eq!(
        eval_ok("dt.DateTime(2015, 3, 4, 12, 30)"),
        Value::DateTime(expected)
    );
    assert_eq!(
        eval_ok("datetime.timedelta(1, -1)"),
        Value::TimeDelta(TimeDelta::days(1) - TimeDelta::seconds(1))
    );
    assert_eq!(
        eval_ok("datetime.timedelta(-1, 86399, 999999)"),
        Value::TimeDelta(TimeDelta::microseconds(-1))
    );
}

#[test]
fn test_constructor_errors() {
    assert_eq!(
        conversion_kind("datetime.date(2015, 3, 4)"),
        ConversionKind::UnknownConstructor {
            name: "date".to_string()
        }
    );
    assert_eq!(
        conversion_kind("datetime.datetime(2015, 13, 1)"),
        ConversionKind::InvalidArguments {
            constructor: "datetime",
            message: "month must be in 1..12".to_string()
        }
    );
    assert!(matches!(
        eval("datetime.datetime(2015, 13, 1)").unwrap_err().kind(),
        ErrorKind::Eval
    ));
}

#[test]
fn test_unsafe_names() {
    assert_eq!(
        unsafe_kind("a"),
        UnsafeKind::UnsupportedName {
            name: "a".to_string()
        }
    );
    assert_eq!(
        unsafe_kind("[1, os]"),
        UnsafeKind::UnsupportedName {
            name: "os".to_string()
        }
    );
}

#[test]
fn test_unsafe_arithmetic() {
    assert!(matches!(
        unsafe_kind("a+2"),
        UnsafeKind::MalformedNode { .. }
    ));
    assert!(matches!(
        unsafe_kind("2 * 3"),
        UnsafeKind::MalformedNode { .. }
    ));
    assert!(matches!(unsafe_kind("-[1]"), UnsafeKind::MalformedNode { .. }));
    assert!(matches!(unsafe_kind("~1"), UnsafeKind::MalformedNode { .. }));
    assert!(matches!(
        unsafe_kind("1 + True"),
        UnsafeKind::MalformedNode { .. }
    ));
    assert!(matches!(unsafe_kind("1j"), UnsafeKind::MalformedNode { .. }));
}

#[test]
fn test_unsafe_calls() {
    assert_eq!(
        unsafe_kind("eval()"),
        UnsafeKind::NotAConstructor {
            snippet: "eval()".to_string()
        }
    );
    assert!(matches!(
        unsafe_kind("datetime.datetime(year=2015, month=1, day=1)"),
        UnsafeKind::KeywordArguments { .. }
    ));
    assert!(matches!(
        unsafe_kind("datetime.datetime(*args)"),
        UnsafeKind::KeywordArguments { .. }
    ));
    assert!(matches!(
        unsafe_kind("datetime.timedelta(**kw)"),
        UnsafeKind::KeywordArguments { .. }
    ));
    // Arguments are converted before the constructor runs.
    assert!(matches!(
        unsafe_kind("datetime.datetime(x, 1, 1)"),
        UnsafeKind::UnsupportedName { .. }
    ));
}

#[test]
fn test_unsafe_shapes() {
    crate::test_utils::init_test_logging();
    for source in [
        "x.y",
        "x[0]",
        "[1][0]",
        "lambda: 1",
        "1 if True else 2",
        "[x for x in y]",
        "(x := 1)",
        "not True",
        "1 < 2",
        "True and False",
        "...",
        "f'{x}'",
        "{**a}",
        "[*a]",
    ] {
        assert!(
            matches!(unsafe_kind(source), UnsafeKind::MalformedNode { .. }),
            "{source}"
        );
    }
}

#[test]
fn test_malformed_node_quotes_source() {
    match unsafe_kind("[1, 2 * 3]") {
        UnsafeKind::MalformedNode { snippet, dump } => {
            assert_eq!(snippet, "2 * 3");
            assert!(dump.contains("Mul"), "{dump}");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_malformed_snippet_has_no_trailing_space() {
    match unsafe_kind("'a'  + 'b'") {
        UnsafeKind::MalformedNode { snippet, .. } => assert_eq!(snippet, "'a'"),
        other => panic!("unexpected {:?}", other),
    }
    let err = eval("['a'   # trailing\n + 1]").unwrap_err();
    assert_eq!(err.span().map(|span| span.0), Some(1..4));
}

#[test]
fn test_error_span_points_at_node() {
    let err = eval("[1, foo]").unwrap_err();
    assert!(err.is_unsafe());
    assert_eq!(err.span(), Some(parser::Span::new(4, 7)));
    assert_eq!(err.source_text(), Some("[1, foo]"));
}

#[test]
fn test_syntax_errors_are_distinct() {
    for source in [":", "import os", "x = 1", "[1, 2", ""] {
        let err = eval(source).unwrap_err();
        assert!(err.is_syntax(), "{source}: {err}");
        assert!(!err.is_unsafe());
    }
}

#[test]
fn test_diagnostic_codes() {
    let code = |source: &str| eval(source).unwrap_err().to_diagnostic().code;
    assert_eq!(code("a").as_deref(), Some("U001"));
    assert_eq!(code("1 * 2").as_deref(), Some("U002"));
    assert_eq!(code("eval()").as_deref(), Some("U003"));
    assert_eq!(code("x.datetime(a=1)").as_deref(), Some("U004"));
    assert_eq!(code("x.date()").as_deref(), Some("E001"));
    assert_eq!(code("x.timedelta('1')").as_deref(), Some("E002"));
    assert_eq!(code("9223372036854775807 + 1").as_deref(), Some("E003"));
}
