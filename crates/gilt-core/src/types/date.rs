//! Date type for gilt calculations.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GiltError, GiltResult};

/// A calendar date for gilt calculations.
///
/// This is a newtype wrapper around `chrono::NaiveDate` providing the
/// weekday-only business-day arithmetic needed for the UK gilt ex-dividend
/// rule. No holiday calendar is applied; Saturdays and Sundays are the only
/// non-business days.
///
/// # Example
///
/// ```rust
/// use gilt_core::types::Date;
///
/// let coupon = Date::from_ymd(2024, 6, 7).unwrap();
/// let ex_div_start = coupon.sub_business_days(7);
/// assert!(ex_div_start < coupon);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `GiltError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> GiltResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| GiltError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from year, month, and day, returning `None` for
    /// invalid combinations (e.g. day 31 in a 30-day month).
    #[must_use]
    pub fn from_ymd_opt(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `GiltError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> GiltResult<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|_| GiltError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns today's date.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_until(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the date is a weekend (Saturday or Sunday).
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Checks if the date is a business day (Monday through Friday).
    #[must_use]
    pub fn is_business_day(&self) -> bool {
        !self.is_weekend()
    }

    /// Returns the business day strictly before this date.
    #[must_use]
    pub fn previous_business_day(&self) -> Self {
        let mut current = self.add_days(-1);
        while !current.is_business_day() {
            current = current.add_days(-1);
        }
        current
    }

    /// Steps back `n` business days, one at a time.
    ///
    /// Matches the UK gilt ex-dividend convention: each step lands on the
    /// previous weekday, so `n` steps from a Monday cross the weekend once.
    #[must_use]
    pub fn sub_business_days(&self, n: u32) -> Self {
        let mut current = *self;
        for _ in 0..n {
            current = current.previous_business_day();
        }
        current
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2024, 6, 7).unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 7);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2024, 2, 30).is_err());
        assert!(Date::from_ymd(2024, 13, 1).is_err());
        assert!(Date::from_ymd_opt(2024, 4, 31).is_none());
    }

    #[test]
    fn test_parse() {
        let date = Date::parse("2024-06-07").unwrap();
        assert_eq!(date, Date::from_ymd(2024, 6, 7).unwrap());
        assert!(Date::parse("07/06/2024").is_err());
    }

    #[test]
    fn test_days_until() {
        let d1 = Date::from_ymd(2023, 12, 7).unwrap();
        let d2 = Date::from_ymd(2024, 1, 15).unwrap();
        assert_eq!(d1.days_until(&d2), 39);
        assert_eq!(d2.days_until(&d1), -39);
    }

    #[test]
    fn test_previous_business_day() {
        // Monday 2024-06-10 -> Friday 2024-06-07
        let monday = Date::from_ymd(2024, 6, 10).unwrap();
        let friday = Date::from_ymd(2024, 6, 7).unwrap();
        assert_eq!(monday.previous_business_day(), friday);

        // Wednesday -> Tuesday
        let wednesday = Date::from_ymd(2024, 6, 12).unwrap();
        assert_eq!(
            wednesday.previous_business_day(),
            Date::from_ymd(2024, 6, 11).unwrap()
        );
    }

    #[test]
    fn test_sub_business_days() {
        // 7 business days back from Friday 2024-06-07 crosses one weekend:
        // Thu 6, Wed 5, Tue 4, Mon 3, Fri May 31, Thu 30, Wed 29
        let coupon = Date::from_ymd(2024, 6, 7).unwrap();
        assert_eq!(
            coupon.sub_business_days(7),
            Date::from_ymd(2024, 5, 29).unwrap()
        );
        assert_eq!(coupon.sub_business_days(0), coupon);
    }

    #[test]
    fn test_weekend_detection() {
        assert!(Date::from_ymd(2024, 6, 8).unwrap().is_weekend()); // Saturday
        assert!(Date::from_ymd(2024, 6, 9).unwrap().is_weekend()); // Sunday
        assert!(Date::from_ymd(2024, 6, 10).unwrap().is_business_day()); // Monday
    }

    #[test]
    fn test_display() {
        let date = Date::from_ymd(2024, 6, 7).unwrap();
        assert_eq!(format!("{date}"), "2024-06-07");
    }

    #[test]
    fn test_serde_transparent() {
        let date = Date::from_ymd(2024, 6, 7).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-06-07\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }
}
