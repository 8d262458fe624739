//! Typed field values
//!
//! One variant per `FieldType`, one payload shape per variant. Conversion to
//! and from the persisted TOML representation and to display text are
//! exhaustive matches over this enum.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use toml::value::{Date as TomlDate, Datetime, Time as TomlTime};

use crate::schema::FieldType;

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A value consistent with exactly one field type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Choice(String),
}

impl FieldValue {
    /// The field type this value belongs to
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::Time(_) => FieldType::Time,
            FieldValue::Choice(_) => FieldType::Choice,
        }
    }

    /// Native TOML representation.
    ///
    /// Integral numbers within the exactly-representable range are stored as
    /// TOML integers, every other number as a float.
    pub fn to_toml(&self) -> toml::Value {
        match self {
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    toml::Value::Integer(*n as i64)
                } else {
                    toml::Value::Float(*n)
                }
            }
            FieldValue::Text(s) | FieldValue::Choice(s) => toml::Value::String(s.clone()),
            FieldValue::Boolean(b) => toml::Value::Boolean(*b),
            FieldValue::Date(d) => toml::Value::Datetime(Datetime {
                date: Some(TomlDate {
                    year: d.year() as u16,
                    month: d.month() as u8,
                    day: d.day() as u8,
                }),
                time: None,
                offset: None,
            }),
            FieldValue::Time(t) => toml::Value::Datetime(Datetime {
                date: None,
                time: Some(TomlTime {
                    hour: t.hour() as u8,
                    minute: t.minute() as u8,
                    second: t.second() as u8,
                    nanosecond: 0,
                }),
                offset: None,
            }),
        }
    }

    /// Decodes a persisted value as the given field type.
    ///
    /// Returns `None` when the stored value does not have the shape the
    /// type requires (for example a stale value written under an older
    /// schema).
    pub fn from_toml(field_type: FieldType, value: &toml::Value) -> Option<Self> {
        match (field_type, value) {
            (FieldType::Number, toml::Value::Integer(i)) => Some(FieldValue::Number(*i as f64)),
            (FieldType::Number, toml::Value::Float(f)) if f.is_finite() => {
                Some(FieldValue::Number(*f))
            }
            (FieldType::Text, toml::Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldType::Choice, toml::Value::String(s)) => Some(FieldValue::Choice(s.clone())),
            (FieldType::Boolean, toml::Value::Boolean(b)) => Some(FieldValue::Boolean(*b)),
            (FieldType::Date, toml::Value::Datetime(dt)) => match (dt.date, dt.time, dt.offset) {
                (Some(d), None, None) => {
                    NaiveDate::from_ymd_opt(i32::from(d.year), u32::from(d.month), u32::from(d.day))
                        .map(FieldValue::Date)
                }
                _ => None,
            },
            (FieldType::Time, toml::Value::Datetime(dt)) => match (dt.date, dt.time, dt.offset) {
                (None, Some(t), None) => NaiveTime::from_hms_opt(
                    u32::from(t.hour),
                    u32::from(t.minute),
                    u32::from(t.second),
                )
                .map(FieldValue::Time),
                _ => None,
            },
            _ => None,
        }
    }

    /// Raw form input that coerces back into this value.
    pub fn to_form_value(&self) -> serde_json::Value {
        match self {
            FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => format_number(*n, f),
            FieldValue::Text(s) | FieldValue::Choice(s) => write!(f, "{}", s),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
        }
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> FieldValue {
        FieldValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_numbers_store_as_integer_when_integral() {
        assert_eq!(FieldValue::Number(42.0).to_toml(), toml::Value::Integer(42));
        assert_eq!(FieldValue::Number(-3.0).to_toml(), toml::Value::Integer(-3));
        assert_eq!(FieldValue::Number(2.5).to_toml(), toml::Value::Float(2.5));
        assert_eq!(FieldValue::Number(1e300).to_toml(), toml::Value::Float(1e300));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(FieldValue::Number(1.0).to_string(), "1");
        assert_eq!(FieldValue::Number(-0.25).to_string(), "-0.25");
        assert_eq!(FieldValue::Number(1e20).to_string(), "100000000000000000000");
    }

    #[test]
    fn test_date_and_time_use_native_toml_types() {
        let value = date(2024, 2, 29).to_toml();
        assert!(matches!(&value, toml::Value::Datetime(dt) if dt.to_string() == "2024-02-29"));
        assert_eq!(FieldValue::from_toml(FieldType::Date, &value), Some(date(2024, 2, 29)));

        let time = FieldValue::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        let value = time.to_toml();
        assert!(matches!(&value, toml::Value::Datetime(dt) if dt.to_string() == "08:30:00"));
        assert_eq!(FieldValue::from_toml(FieldType::Time, &value), Some(time));
    }

    #[test]
    fn test_mismatched_shapes_do_not_decode() {
        let text = toml::Value::String("2024-01-01".into());
        assert_eq!(FieldValue::from_toml(FieldType::Date, &text), None);
        assert_eq!(FieldValue::from_toml(FieldType::Number, &text), None);
        assert_eq!(
            FieldValue::from_toml(FieldType::Text, &toml::Value::Integer(1)),
            None
        );
        let midnight = FieldValue::Time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()).to_toml();
        assert_eq!(FieldValue::from_toml(FieldType::Date, &midnight), None);
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(date(2023, 1, 5).to_string(), "2023-01-05");
        assert_eq!(
            FieldValue::Time(NaiveTime::from_hms_opt(23, 59, 59).unwrap()).to_string(),
            "23:59:59"
        );
        assert_eq!(FieldValue::Boolean(false).to_string(), "false");
        assert_eq!(FieldValue::Choice("done".into()).to_string(), "done");
    }

    #[test]
    fn test_form_value() {
        assert_eq!(FieldValue::Boolean(true).to_form_value(), serde_json::json!(true));
        assert_eq!(FieldValue::Number(7.0).to_form_value(), serde_json::json!("7"));
    }
}
