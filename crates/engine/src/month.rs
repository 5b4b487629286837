//! Calendar-month keys.
//!
//! Balance and income rows are keyed by month, normalized to the first day of
//! that month. Forms submit `YYYY-MM`; the store holds a DATE.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::EngineError;

/// A calendar month, held as the first day of the month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Parses `YYYY-MM` or `YYYY-MM-DD` input; any day-of-month is normalized
    /// to the 1st.
    pub fn parse(input: &str) -> Result<Self, EngineError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidDate("month is required".to_string()));
        }

        let date = if trimmed.len() == 7 {
            NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        } else {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        }
        .map_err(|_| EngineError::InvalidDate(format!("invalid month: {trimmed}")))?;

        Ok(Self::from_date(date))
    }

    /// Builds a key from any date within the month.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        // with_day(1) cannot fail: every month has a day 1.
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The underlying date (always the 1st).
    #[must_use]
    pub const fn as_date(self) -> NaiveDate {
        self.0
    }

    /// Human-readable label, e.g. `Mar 2025`. Used by the export sheets.
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%b %Y").to_string()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MonthKey::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_year_month_input() {
        let key = MonthKey::parse("2025-03").unwrap();
        assert_eq!(key.as_date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(key.to_string(), "2025-03");
    }

    #[test]
    fn normalizes_day_to_first() {
        let key = MonthKey::parse("2025-03-17").unwrap();
        assert_eq!(key.as_date(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(MonthKey::parse("").is_err());
        assert!(MonthKey::parse("march").is_err());
        assert!(MonthKey::parse("2025-13").is_err());
    }

    #[test]
    fn label_is_short_month_and_year() {
        assert_eq!(MonthKey::parse("2025-03").unwrap().label(), "Mar 2025");
    }

    #[test]
    fn orders_by_calendar_date() {
        let jan = MonthKey::parse("2025-01").unwrap();
        let feb = MonthKey::parse("2025-02").unwrap();
        assert!(jan < feb);
    }
}
