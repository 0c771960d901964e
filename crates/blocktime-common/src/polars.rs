//! Polars `AnyValue` conversions.
//!
//! Every reader in the workspace goes through these functions so that a cell
//! holding `42`, `42.0` or `"42"` decodes the same way regardless of whether
//! it came from a CSV file or a workbook.

use polars::prelude::*;

/// Converts a Polars `AnyValue` to its display string.
///
/// Returns an empty string for `Null`; floats are printed without trailing
/// zeros so that whole-number cells read back as integers.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use blocktime_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Float64(90.0)), "90");
/// assert_eq!(any_to_string(AnyValue::String("URO")), "URO");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => {
            let s = other.to_string();
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Converts a cell to text, treating null and whitespace-only values as absent.
///
/// The returned string is not trimmed: join keys such as surgeon names are
/// matched exactly as uploaded.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let s = any_to_string(value);
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Formats a float without trailing zeros after the decimal point.
///
/// # Examples
///
/// ```
/// use blocktime_common::format_numeric;
///
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(40.0), "40");
/// assert_eq!(format_numeric(0.25), "0.25");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` to `i64`, returning `None` for non-integer or null values.
///
/// Workbook readers hand back month and year columns as floats, so whole
/// floats are accepted; fractional ones are rejected rather than truncated.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => whole_float(f64::from(v)),
        AnyValue::Float64(v) => whole_float(v),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

fn whole_float(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as `i64`, returning `None` for invalid or empty strings.
///
/// `"7.0"` is accepted as `7`; CSV exports of numeric columns often carry
/// the decimal.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_float))
}

/// Outcome of reading a numeric cell.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericCell {
    /// Null or blank.
    Missing,
    /// A parsed number.
    Value(f64),
    /// Something was there but it is not a number; carries the raw text.
    Invalid(String),
}

impl NumericCell {
    /// The parsed value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Reads a cell that should hold a number, keeping track of unparseable text.
pub fn numeric_cell(value: AnyValue<'_>) -> NumericCell {
    let raw = any_to_string(value.clone());
    if raw.trim().is_empty() {
        return NumericCell::Missing;
    }
    match any_to_f64(value) {
        Some(v) if v.is_finite() => NumericCell::Value(v),
        _ => NumericCell::Invalid(raw),
    }
}

/// Rounds to a fixed number of decimal places.
///
/// # Examples
///
/// ```
/// use blocktime_common::round_to;
///
/// assert_eq!(round_to(100.0 / 60.0, 6), 1.666667);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// ```
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
