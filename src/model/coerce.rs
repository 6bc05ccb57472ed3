//
//  life360-client
//  model/coerce.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Loose Value Coercion
//!
//! The Life360 API is inconsistent about field types: the same field may arrive
//! as `42`, `"42"`, `true` or `"yes"` depending on the endpoint. The functions in
//! this module turn such values into their intended semantic type on a
//! best-effort basis.
//!
//! Every function here is pure and total:
//!
//! - an already correctly typed value is kept,
//! - a textual encoding matching the target grammar is converted,
//! - anything else is handed back untouched as [`Loose::Raw`].
//!
//! Coercion never fails. Validation of the result is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use life360_client::model::coerce::{as_bool, as_int, Loose};
//! use serde_json::json;
//!
//! assert_eq!(as_int(&json!("42")), Loose::Typed(42));
//! assert_eq!(as_int(&json!("-42")), Loose::Raw(json!("-42")));
//! assert_eq!(as_bool(&json!("yes")), Loose::Typed(true));
//! assert_eq!(as_bool(&json!("maybe")), Loose::Raw(json!("maybe")));
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Epoch values below this are second precision, everything else is millis.
///
/// Millisecond timestamps for any date after early 1973 exceed this value.
pub const SECONDS_THRESHOLD: i64 = 100_000_000_000;

/// Optional sign, digits, optional `.`/`,` fraction.
static FLOAT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+(?:[.,][0-9]*)?$").unwrap());

/// Naive date-time layouts tried after RFC 3339 and RFC 2822.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// The outcome of a coercion: either the typed value or the original input.
///
/// `Loose` keeps the upstream payload lossless. When a field could not be
/// interpreted, the raw JSON value is preserved so callers can still inspect
/// it.
///
/// # Example
///
/// ```rust
/// use life360_client::model::coerce::{as_float, Loose};
/// use serde_json::json;
///
/// let speed = as_float(&json!("12,5"));
/// assert_eq!(speed.get(), Some(12.5));
///
/// let broken = as_float(&json!("fast"));
/// assert_eq!(broken.get(), None);
/// assert_eq!(broken.raw(), Some(&json!("fast")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Loose<T> {
    /// The value was (or was converted to) the intended type.
    Typed(T),
    /// The value did not match the target grammar and was passed through.
    Raw(Value),
}

impl<T> Loose<T> {
    /// Returns the typed value, if coercion succeeded.
    pub fn typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Consumes the wrapper, returning the typed value if coercion succeeded.
    pub fn into_typed(self) -> Option<T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }

    /// Returns the passed-through raw value, if coercion did not apply.
    pub fn raw(&self) -> Option<&Value> {
        match self {
            Self::Typed(_) => None,
            Self::Raw(value) => Some(value),
        }
    }

    /// Returns `true` when the value carries the intended type.
    pub fn is_typed(&self) -> bool {
        matches!(self, Self::Typed(_))
    }
}

impl<T: Copy> Loose<T> {
    /// Returns a copy of the typed value, if coercion succeeded.
    pub fn get(&self) -> Option<T> {
        self.typed().copied()
    }
}

impl<T: Serialize> Serialize for Loose<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Typed(value) => value.serialize(serializer),
            Self::Raw(value) => value.serialize(serializer),
        }
    }
}

fn is_unsigned_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Tries to interpret a value as an integer.
///
/// Only strings made entirely of ASCII digits are converted. Negative numbers
/// and decimals in string form are deliberately left alone, as are digit
/// strings too large for an `i64`. JSON integers are already typed and are
/// kept.
///
/// # Example
///
/// ```rust
/// use life360_client::model::coerce::{as_int, Loose};
/// use serde_json::json;
///
/// assert_eq!(as_int(&json!("0017")), Loose::Typed(17));
/// assert_eq!(as_int(&json!(-3)), Loose::Typed(-3));
/// assert_eq!(as_int(&json!("1.5")), Loose::Raw(json!("1.5")));
/// ```
pub fn as_int(value: &Value) -> Loose<i64> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(int) => Loose::Typed(int),
            None => Loose::Raw(value.clone()),
        },
        Value::String(text) if is_unsigned_digits(text) => match text.parse::<i64>() {
            Ok(int) => Loose::Typed(int),
            Err(_) => Loose::Raw(value.clone()),
        },
        _ => Loose::Raw(value.clone()),
    }
}

/// Tries to interpret a value as a floating point number.
///
/// Strings matching an optional minus, one or more digits and an optional
/// fractional part introduced by `.` or `,` are converted. A `,` is read as
/// the decimal separator. JSON numbers are kept.
pub fn as_float(value: &Value) -> Loose<f64> {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(float) => Loose::Typed(float),
            None => Loose::Raw(value.clone()),
        },
        Value::String(text) if FLOAT_PATTERN.is_match(text) => {
            match text.replace(',', ".").parse::<f64>() {
                Ok(float) => Loose::Typed(float),
                Err(_) => Loose::Raw(value.clone()),
            }
        }
        _ => Loose::Raw(value.clone()),
    }
}

/// Tries to interpret a value as a boolean.
///
/// This is a literal lookup, not a truthiness cast:
///
/// | Input | Result |
/// |-------|--------|
/// | `"1"`, `1`, `"yes"`, `"true"` | `true` |
/// | `"0"`, `0`, `"no"`, `"false"` | `false` |
/// | `true` / `false` | unchanged |
/// | anything else | passed through |
pub fn as_bool(value: &Value) -> Loose<bool> {
    match value {
        Value::Bool(flag) => Loose::Typed(*flag),
        Value::String(text) => match text.as_str() {
            "1" | "yes" | "true" => Loose::Typed(true),
            "0" | "no" | "false" => Loose::Typed(false),
            _ => Loose::Raw(value.clone()),
        },
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => Loose::Typed(true),
            Some(n) if n == 0.0 => Loose::Typed(false),
            _ => Loose::Raw(value.clone()),
        },
        _ => Loose::Raw(value.clone()),
    }
}

/// Tries to interpret a value as a point in time.
///
/// Returns `None` for JSON `null`. Otherwise the value first goes through
/// [`as_int`]; numbers below [`SECONDS_THRESHOLD`] are treated as seconds and
/// scaled to milliseconds. Numbers are then read as epoch milliseconds and
/// strings as RFC 3339, RFC 2822, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC).
/// Anything that fails to parse is returned unchanged.
///
/// # Notes
///
/// The threshold misclassifies millisecond values before March 1973 and
/// second values after the year 5138. It matches what the service sends.
///
/// # Example
///
/// ```rust
/// use life360_client::model::coerce::as_timestamp;
/// use serde_json::json;
///
/// let seconds = as_timestamp(&json!("1577836800")).unwrap();
/// let millis = as_timestamp(&json!(1577836800000_i64)).unwrap();
/// assert_eq!(seconds, millis);
/// assert!(as_timestamp(&json!(null)).is_none());
/// ```
pub fn as_timestamp(value: &Value) -> Option<Loose<DateTime<Utc>>> {
    if value.is_null() {
        return None;
    }

    let candidate = match as_int(value) {
        Loose::Typed(int) => Value::from(int),
        Loose::Raw(raw) => raw,
    };

    let parsed = match &candidate {
        Value::Number(number) => number.as_f64().and_then(epoch_to_datetime),
        Value::String(text) => parse_datetime_text(text),
        _ => None,
    };

    Some(match parsed {
        Some(datetime) => Loose::Typed(datetime),
        None => Loose::Raw(value.clone()),
    })
}

fn epoch_to_datetime(epoch: f64) -> Option<DateTime<Utc>> {
    if !epoch.is_finite() {
        return None;
    }
    let millis = if epoch < SECONDS_THRESHOLD as f64 {
        epoch * 1000.0
    } else {
        epoch
    };
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

fn parse_datetime_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(text) {
        return Some(datetime.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_as_int_digit_strings() {
        assert_eq!(as_int(&json!("0")), Loose::Typed(0));
        assert_eq!(as_int(&json!("123456")), Loose::Typed(123456));
        assert_eq!(as_int(&json!(77)), Loose::Typed(77));
    }

    #[test]
    fn test_as_int_passes_through_non_digits() {
        for text in ["", "-1", "1.5", "12a", " 12", "abc"] {
            assert_eq!(as_int(&json!(text)), Loose::Raw(json!(text)));
        }
        assert_eq!(as_int(&json!(1.5)), Loose::Raw(json!(1.5)));
        assert_eq!(as_int(&json!(true)), Loose::Raw(json!(true)));
        assert_eq!(as_int(&json!(null)), Loose::Raw(json!(null)));
    }

    #[test]
    fn test_as_int_overflow_passes_through() {
        let huge = "99999999999999999999999";
        assert_eq!(as_int(&json!(huge)), Loose::Raw(json!(huge)));
    }

    #[test]
    fn test_as_float() {
        assert_eq!(as_float(&json!("40.7")), Loose::Typed(40.7));
        assert_eq!(as_float(&json!("-74,25")), Loose::Typed(-74.25));
        assert_eq!(as_float(&json!("5.")), Loose::Typed(5.0));
        assert_eq!(as_float(&json!("12")), Loose::Typed(12.0));
        assert_eq!(as_float(&json!(3)), Loose::Typed(3.0));
        assert_eq!(as_float(&json!(".5")), Loose::Raw(json!(".5")));
        assert_eq!(as_float(&json!("1e5")), Loose::Raw(json!("1e5")));
        assert_eq!(as_float(&json!("north")), Loose::Raw(json!("north")));
    }

    #[test]
    fn test_as_bool_literal_table() {
        for truthy in [json!("1"), json!(1), json!("yes"), json!("true"), json!(true)] {
            assert_eq!(as_bool(&truthy), Loose::Typed(true), "{truthy}");
        }
        for falsy in [json!("0"), json!(0), json!("no"), json!("false"), json!(false)] {
            assert_eq!(as_bool(&falsy), Loose::Typed(false), "{falsy}");
        }
        for other in [json!("TRUE"), json!(2), json!(""), json!("on"), json!(null), json!([])] {
            assert_eq!(as_bool(&other), Loose::Raw(other.clone()), "{other}");
        }
    }

    #[test]
    fn test_as_timestamp_seconds_are_scaled() {
        let t: i64 = 1_577_836_800;
        let parsed = as_timestamp(&json!(t)).unwrap().into_typed().unwrap();
        assert_eq!(parsed.timestamp_millis(), t * 1000);

        let from_text = as_timestamp(&json!(t.to_string())).unwrap().into_typed().unwrap();
        assert_eq!(from_text, parsed);
    }

    #[test]
    fn test_as_timestamp_threshold_boundary() {
        let below = SECONDS_THRESHOLD - 1;
        let parsed = as_timestamp(&json!(below)).unwrap().into_typed().unwrap();
        assert_eq!(parsed.timestamp_millis(), below * 1000);

        let at = SECONDS_THRESHOLD;
        let parsed = as_timestamp(&json!(at)).unwrap().into_typed().unwrap();
        assert_eq!(parsed.timestamp_millis(), at);
    }

    #[test]
    fn test_as_timestamp_text_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 1, 1, 12, 30, 0).unwrap();
        for text in [
            "2020-01-01T12:30:00Z",
            "2020-01-01T14:30:00+02:00",
            "Wed, 01 Jan 2020 12:30:00 +0000",
            "2020-01-01 12:30:00",
        ] {
            assert_eq!(as_timestamp(&json!(text)), Some(Loose::Typed(expected)), "{text}");
        }
        let midnight = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(as_timestamp(&json!("2020-01-01")), Some(Loose::Typed(midnight)));
    }

    #[test]
    fn test_as_timestamp_passes_through_garbage() {
        assert_eq!(as_timestamp(&json!(null)), None);
        assert_eq!(as_timestamp(&json!("soon")), Some(Loose::Raw(json!("soon"))));
        assert_eq!(as_timestamp(&json!({"t": 1})), Some(Loose::Raw(json!({"t": 1}))));
        assert_eq!(as_timestamp(&json!(false)), Some(Loose::Raw(json!(false))));
    }

    #[test]
    fn test_coercion_is_idempotent_through_serialization() {
        let once = as_timestamp(&json!(1_577_836_800)).unwrap();
        let serialized = serde_json::to_value(&once).unwrap();
        assert_eq!(as_timestamp(&serialized), Some(once));

        let int = as_int(&json!("12"));
        assert_eq!(as_int(&serde_json::to_value(&int).unwrap()), int);
    }
}
