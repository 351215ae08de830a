#[macro_use]
mod cases;

use chrono::{NaiveDate, TimeDelta};
use dataeval::{ConversionKind, DataEvalError, ErrorKind, Value, data_eval};

test_case!(
    datetime_minutes,
    input: "datetime.datetime(2015, 3, 4, 12, 30)",
    value: Value::DateTime(
        NaiveDate::from_ymd_opt(2015, 3, 4).unwrap().and_hms_opt(12, 30, 0).unwrap()
    ),
    encoded: "datetime.datetime(2015, 3, 4, 12, 30)",
);

test_case!(
    datetime_date_only,
    input: "datetime.datetime(2000, 1, 1)",
    encoded: "datetime.datetime(2000, 1, 1, 0, 0)",
);

test_case!(
    datetime_microseconds,
    input: "datetime.datetime(2015, 3, 4, 12, 30, 0, 250)",
    encoded: "datetime.datetime(2015, 3, 4, 12, 30, 0, 250)",
);

test_case!(
    datetime_attribute_case,
    input: "datetime.DATETIME(1999, 12, 31, 23, 59, 59)",
    encoded: "datetime.datetime(1999, 12, 31, 23, 59, 59)",
);

test_case!(
    timedelta_empty,
    input: "datetime.timedelta()",
    value: Value::TimeDelta(TimeDelta::zero()),
    encoded: "datetime.timedelta(0)",
);

test_case!(
    timedelta_normalized,
    input: "datetime.timedelta(0, -1)",
    value: Value::TimeDelta(TimeDelta::seconds(-1)),
    encoded: "datetime.timedelta(-1, 86399)",
);

test_case!(
    timedelta_all_components,
    input: "datetime.timedelta(1, 2, 3, 4, 5, 6, 1)",
    encoded: "datetime.timedelta(8, 21902, 4003)",
);

test_case!(
    timedelta_float_days,
    input: "datetime.timedelta(1.5)",
    encoded: "datetime.timedelta(1, 43200)",
);

test_case!(
    datetime_in_container,
    input: "{'start': datetime.datetime(2015, 3, 4, 0, 0), 'every': datetime.timedelta(7)}",
    encoded: "{'every': datetime.timedelta(7), 'start': datetime.datetime(2015, 3, 4, 0, 0)}",
);

test_case!(
    datetime_too_few_arguments,
    input: "datetime.datetime(2015, 3)",
    error: ErrorKind::Eval,
);

test_case!(
    datetime_invalid_day,
    input: "datetime.datetime(2015, 2, 30)",
    error: ErrorKind::Eval,
);

test_case!(
    timedelta_string_argument,
    input: "datetime.timedelta('1')",
    error: ErrorKind::Eval,
);

test_case!(
    keyword_arguments,
    input: "datetime.timedelta(days=1)",
    error: ErrorKind::Unsafe,
);

test_case!(
    unknown_constructor,
    input: "datetime.date(2015, 3, 4)",
    error: ErrorKind::Eval,
);

#[test]
fn test_constructor_error_messages() {
    let Err(DataEvalError::Conversion(err)) = data_eval("datetime.datetime(2015, 2, 30)") else {
        panic!("expected a conversion error");
    };
    assert_eq!(
        err.kind,
        ConversionKind::InvalidArguments {
            constructor: "datetime",
            message: "day is out of range for month".to_string(),
        }
    );
    assert_eq!(err.to_string(), "datetime(): day is out of range for month");

    let err = data_eval("dt.time(1)").unwrap_err();
    assert_eq!(err.to_string(), "no conversion function for 'time'");
}
