//! # Reporting Periods
//!
//! Calendar months used as aggregation buckets, and parsing of bill dates.
//!
//! Bill dates are calendar dates, not instants. A bill written on
//! `2024-01-31T23:30:00+05:30` belongs to January no matter what time zone
//! the report runs in, so timestamps are cut to their written date and never
//! converted.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A calendar month, keyed as `"YYYY-MM"`.
///
/// Orders chronologically; for four-digit years this coincides with
/// lexicographic order of the key. Years outside 0-9999 are written with a
/// sign (`+10000-03`, `-1-12`) and parse back the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Returns `None` unless `month` is 1-12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Period { year, month })
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// `"2024-03"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Years outside 0..=9999 carry an explicit sign.
        if (0..=9999).contains(&self.year) {
            write!(f, "{:04}-{:02}", self.year, self.month)
        } else {
            write!(f, "{:+}-{:02}", self.year, self.month)
        }
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "period".to_string(),
            reason: "expected YYYY-MM".to_string(),
        };
        let (year_text, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let signed = year_text.starts_with(|c: char| c == '+' || c == '-');
        let digits = if signed { &year_text[1..] } else { year_text };
        let all_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(digits) || !all_digits(month) || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year_text.parse().map_err(|_| invalid())?;
        // Only the form Display produces is accepted.
        if signed == (0..=9999).contains(&year) || (!signed && digits.len() != 4) {
            return Err(invalid());
        }
        let month = month.parse().map_err(|_| invalid())?;
        Period::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a bill date as sent by the form or stored by the persistence layer.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; for timestamps the date
/// is taken as written in the string's own offset.
///
/// ## Example
/// ```rust
/// use billbook_core::period::parse_bill_date;
///
/// let date = parse_bill_date("2024-01-31T23:30:00+05:30").unwrap();
/// assert_eq!(date.to_string(), "2024-01-31");
/// ```
pub fn parse_bill_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.date_naive())
        .map_err(|_| ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: "expected YYYY-MM-DD or an RFC 3339 timestamp".to_string(),
        })
}

/// Serde adapter running [`parse_bill_date`] on a string field.
pub(crate) fn deserialize_bill_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_bill_date(&raw).map_err(serde::de::Error::custom)
}
