//! Scheduling weekdays.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A weekday on which operating-room blocks are scheduled.
///
/// Ordering follows the calendar (Monday first), never the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// Returned when a day name is not one of the five scheduling weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a scheduling weekday: {0}")]
pub struct UnknownWeekday(pub String);

impl Weekday {
    /// All weekdays, Monday through Friday.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Column header / display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    /// Position in [`Weekday::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Matches a free-text day name, ignoring case and surrounding whitespace.
    ///
    /// Weekend days and anything else return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownWeekday(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_order() {
        let mut days = vec![Weekday::Friday, Weekday::Monday, Weekday::Wednesday];
        days.sort();
        assert_eq!(
            days,
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
        assert_eq!(Weekday::Thursday.index(), 3);
    }

    #[test]
    fn test_parse_is_lenient_on_case_and_whitespace() {
        assert_eq!(Weekday::parse(" tuesday "), Some(Weekday::Tuesday));
        assert_eq!(Weekday::parse("FRIDAY"), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("Saturday"), None);
        assert_eq!(Weekday::parse(""), None);
    }

    #[test]
    fn test_from_str_error() {
        let err = "Sunday".parse::<Weekday>().unwrap_err();
        assert_eq!(err.to_string(), "not a scheduling weekday: Sunday");
    }
}
