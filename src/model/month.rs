//! A calendar month, written as `YYYY-MM`.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A calendar month such as `2024-11`.
///
/// Ordering is chronological, which is also the lexicographic order of the `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct MonthError(String);

impl Display for MonthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MonthError {}

impl Month {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(0..=9999).contains(&year) {
            return Err(MonthError(format!("year {year} is out of range")));
        }
        if !(1..=12).contains(&month) {
            return Err(MonthError(format!("month {month} is out of range")));
        }
        Ok(Self { year, month })
    }

    /// The month of the local wall clock.
    pub fn current() -> Self {
        Self::from_date(&Local::now().date_naive())
    }

    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self {
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

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// A human label such as `November 2024`.
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%B %Y").to_string(),
            None => self.to_string(),
        }
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthError;

    /// Accepts exactly four digits, a dash and two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[5..].iter().all(u8::is_ascii_digit);
        if !shape_ok {
            return Err(MonthError(format!("'{s}' is not in YYYY-MM form")));
        }
        let year = s[..4]
            .parse()
            .map_err(|_| MonthError(format!("'{s}' has an invalid year")))?;
        let month = s[5..]
            .parse()
            .map_err(|_| MonthError(format!("'{s}' has an invalid month")))?;
        Month::new(year, month)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Month::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let m = Month::from_str("2024-03").unwrap();
        assert_eq!(m.year(), 2024);
        assert_eq!(m.month(), 3);
        assert_eq!(m.to_string(), "2024-03");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in ["2024-3", "24-03", "2024/03", "2024-03-01", " 2024-03", "abcd-ef", ""] {
            assert!(Month::from_str(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range_month() {
        assert!(Month::from_str("2024-13").is_err());
        assert!(Month::from_str("2024-00").is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = Month::from_str("2023-12").unwrap();
        let b = Month::from_str("2024-01").unwrap();
        assert!(a < b);
        assert_eq!(a.next(), b);
    }

    #[test]
    fn test_label() {
        assert_eq!(Month::new(2024, 11).unwrap().label(), "November 2024");
    }

    #[test]
    fn test_serde_round_trip() {
        let m = Month::new(2025, 7).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2025-07\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
