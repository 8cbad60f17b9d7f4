//! Time types and Day Count Conventions for option valuation.
//!
//! This module provides:
//! - `Date`: Type-safe date wrapper around chrono::NaiveDate
//! - `DayCountConvention`: Year fraction conventions used by term structures
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::time::{Date, DayCountConvention};
//!
//! let today = Date::from_ymd(2024, 1, 2).unwrap();
//! let maturity = today.add_days(365).unwrap();
//!
//! let yf = DayCountConvention::Actual365Fixed.year_fraction(today, maturity);
//! assert!((yf - 1.0).abs() < 1e-12);
//! ```

use chrono::{Datelike, Days, Local, NaiveDate};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Type-safe date wrapper around chrono::NaiveDate.
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let date = Date::from_ymd(2024, 6, 15).unwrap();
/// let parsed: Date = "2024-06-15".parse().unwrap();
/// assert_eq!(date, parsed);
///
/// let later = date.add_days(10).unwrap();
/// assert_eq!(later - date, 10);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a Date from year, month, and day components.
    ///
    /// # Returns
    /// `Ok(Date)` if the date is valid, `Err(DateError::InvalidDate)` otherwise.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns today's date based on local system time.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    /// Parses a date from ISO 8601 format string (YYYY-MM-DD).
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::Date;
    ///
    /// assert!(Date::parse("2024-06-15").is_ok());
    /// assert!(Date::parse("not-a-date").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the date `days` calendar days later.
    ///
    /// Negative values move the date backwards.
    pub fn add_days(self, days: i64) -> Result<Self, DateError> {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days as u64))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        shifted
            .map(Date)
            .ok_or_else(|| DateError::OutOfRange(format!("{} {:+} days", self, days)))
    }

    /// Returns the year component.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl Sub for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    /// Formats the date as ISO 8601 (YYYY-MM-DD).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day Count Convention (year fraction convention).
///
/// # Variants
/// - `Actual365Fixed`: Actual days / 365 (default for equity derivatives)
/// - `Actual360`: Actual days / 360
/// - `Thirty360`: 30/360 US bond basis
///
/// Parsed from the standard names `ACT/365`, `ACT/360` and `30/360`.
///
/// ```
/// use pricer_core::types::time::DayCountConvention;
///
/// let dc: DayCountConvention = "30/360".parse().unwrap();
/// assert_eq!(dc, DayCountConvention::Thirty360);
/// assert_eq!(dc.name(), "30/360");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual_days / 365.0
    #[default]
    Actual365Fixed,

    /// Actual/360: actual_days / 360.0
    Actual360,

    /// 30/360 US Bond Basis
    ///
    /// Each month is treated as having 30 days, and the year as 360 days.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual365Fixed => "ACT/365",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Calculates the year fraction between two dates.
    ///
    /// Returns a negative value when `start > end`, so callers can use the
    /// sign to detect dates in the past.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2024, 1, 1).unwrap();
    /// let end = Date::from_ymd(2024, 7, 1).unwrap();
    ///
    /// let yf = DayCountConvention::Actual365Fixed.year_fraction(start, end);
    /// assert!((yf - 0.4986).abs() < 0.001);
    ///
    /// let yf_neg = DayCountConvention::Actual365Fixed.year_fraction(end, start);
    /// assert!((yf_neg + 0.4986).abs() < 0.001);
    /// ```
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if start > end {
            return -self.year_fraction(end, start);
        }

        match self {
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (y1, m1, d1) = (start.year(), start.month(), start.day());
                let (y2, m2, d2) = (end.year(), end.month(), end.day());

                // 30/360 US adjustments
                let d1_adj = if d1 == 31 { 30 } else { d1 };
                let d2_adj = if d2 == 31 && d1_adj == 30 { 30 } else { d2 };

                let days = 360 * (y2 - y1)
                    + 30 * (m2 as i32 - m1 as i32)
                    + (d2_adj as i32 - d1_adj as i32);
                days as f64 / 360.0
            }
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACT/365" | "ACT365" | "ACTUAL365FIXED" => Ok(DayCountConvention::Actual365Fixed),
            "ACT/360" | "ACT360" | "ACTUAL360" => Ok(DayCountConvention::Actual360),
            "30/360" | "THIRTY360" => Ok(DayCountConvention::Thirty360),
            other => Err(DateError::ParseError(format!(
                "unknown day count convention '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for DayCountConvention {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCountConvention> for String {
    fn from(value: DayCountConvention) -> Self {
        value.name().to_string()
    }
}
