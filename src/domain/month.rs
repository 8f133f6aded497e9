//! Calendar month keys
//!
//! Key format: `YYYY-MM` when written, `YYYY-M` or `YYYY-MM` when read
//! (e.g., `2025-03`, `2025-3`). Keys order chronologically.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earliest supported year
pub const MIN_YEAR: i32 = 1;
/// Latest supported year (keeps keys four digits wide)
pub const MAX_YEAR: i32 = 9999;

#[derive(Debug, Error, PartialEq)]
pub enum MonthError {
    #[error("Invalid month key: expected 'YYYY-MM', got '{0}'")]
    InvalidKey(String),

    #[error("Month out of range: {0} (expected 1-12)")]
    MonthOutOfRange(u32),

    #[error("Year out of range: {0} (expected {MIN_YEAR}-{MAX_YEAR})")]
    YearOutOfRange(i32),
}

/// A calendar year and 1-based month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Last representable month
    pub const LAST: MonthKey = MonthKey {
        year: MAX_YEAR,
        month: 12,
    };

    /// Creates a key, validating the year and month ranges
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) {
            return Err(MonthError::MonthOutOfRange(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(MonthError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the real-world current month in local time
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of calendar days in this month (28-31)
    pub fn days_in_month(&self) -> usize {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        let next = first.and_then(|date| date.checked_add_months(Months::new(1)));
        match (first, next) {
            (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as usize,
            // Keys are validated to chrono's supported range
            _ => 31,
        }
    }

    /// Returns the month `offset` months away (negative moves backward)
    pub fn offset(&self, offset: i32) -> Result<Self, MonthError> {
        let index = self.index() + i64::from(offset);
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        let year = i32::try_from(year).map_err(|_| MonthError::YearOutOfRange(i32::MAX))?;
        Self::new(year, month)
    }

    /// Signed number of months from `self` to `other`
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        other.index() - self.index()
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month - 1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthError::InvalidKey(s.to_string()))?;

        let digits = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.chars().all(|c| c.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(month, 2) {
            return Err(MonthError::InvalidKey(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| MonthError::InvalidKey(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthError::InvalidKey(s.to_string()))?;

        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
