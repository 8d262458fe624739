//! Per-type parsers for raw form text
//!
//! Each parser receives text that has already been trimmed and is known to
//! be non-empty.

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

/// Raw form value rendered as text. Null and absent values are empty.
pub(crate) fn raw_text(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Truthiness of a raw form value.
pub(crate) fn truthy(raw: Option<&Value>) -> bool {
    match raw {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => {
            let s = s.trim().to_ascii_lowercase();
            !matches!(s.as_str(), "" | "false" | "0" | "no" | "off")
        }
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Finite decimal number.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Calendar-correct `YYYY-MM-DD`.
///
/// The date is rebuilt from its parts and must print back to exactly the
/// input, which rejects nonexistent days such as Feb 30.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if !text.is_ascii() || bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year = digits(&text[0..4])?;
    let month = digits(&text[5..7])?;
    let day = digits(&text[8..10])?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    (date.format("%Y-%m-%d").to_string() == text).then_some(date)
}

/// `HH:MM` or `HH:MM:SS`, hour 0-23, minute and second 0-59.
pub(crate) fn parse_time(text: &str) -> Option<NaiveTime> {
    let mut parts = text.split(':');
    let hour = parts.next().and_then(two_digits)?;
    let minute = parts.next().and_then(two_digits)?;
    let second = match parts.next() {
        Some(part) => two_digits(part)?,
        None => 0,
    };
    if parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn two_digits(part: &str) -> Option<u32> {
    if part.len() != 2 {
        return None;
    }
    digits(part)
}
