//! Case timestamp parsing.

use blocktime_model::ISO_TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;

/// Parses `Patient In Room Date/Time` values.
///
/// The configured format is tried first, then the layout used for workbook
/// date cells.
#[derive(Debug, Clone)]
pub struct TimestampParser {
    format: String,
}

impl TimestampParser {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let trimmed = raw.trim();
        NaiveDateTime::parse_from_str(trimmed, &self.format)
            .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_TIMESTAMP_FORMAT))
            .ok()
    }
}
