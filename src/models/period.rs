//! Calendar-month bucketing
//!
//! Every period filter in the application reduces to "how many calendar
//! months ago did this happen", computed from canonical dates only.

use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Number of calendar months between `date` and `today`
///
/// Same calendar month is 0, the previous month is 1 regardless of the day of
/// month, and the count carries across year boundaries. Dates after `today`
/// bucket into the current month.
pub fn months_ago(date: NaiveDate, today: NaiveDate) -> u32 {
    let now = today.year() as i64 * 12 + today.month0() as i64;
    let then = date.year() as i64 * 12 + date.month0() as i64;
    (now - then).max(0) as u32
}

/// Shift a date by whole months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    add_months_on_day(date, months, date.day())
}

/// Shift a date by whole months and land on `day`, or on the month's last
/// day when the target month is shorter
///
/// Recurring schedules pass their original billing day so a charge on the
/// 31st returns to the 31st after a short month. Results past the supported
/// calendar saturate at `NaiveDate::MAX`.
pub fn add_months_on_day(date: NaiveDate, months: u32, day: u32) -> NaiveDate {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let Ok(year) = i32::try_from(total.div_euclid(12)) else {
        return NaiveDate::MAX;
    };
    let month = total.rem_euclid(12) as u32 + 1;

    (28..=31)
        .rev()
        .find_map(|last| NaiveDate::from_ymd_opt(year, month, last).map(|_| last))
        .and_then(|last| NaiveDate::from_ymd_opt(year, month, day.clamp(1, last)))
        .unwrap_or(NaiveDate::MAX)
}

/// Longest look-back a period filter accepts, in previous months
pub const MAX_PERIOD_MONTHS: u32 = 3;

/// History / analytics period filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Only the current calendar month
    #[default]
    CurrentMonth,
    /// The current month plus the given number of previous months
    LastMonths(u32),
    /// No filtering
    All,
}

impl Period {
    /// Parse "current", "1", "2", "3" or "all"
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "current" | "0" | "month" => Some(Self::CurrentMonth),
            "all" => Some(Self::All),
            other => {
                let n: u32 = other.trim_end_matches('m').parse().ok()?;
                match n {
                    0 => Some(Self::CurrentMonth),
                    1..=MAX_PERIOD_MONTHS => Some(Self::LastMonths(n)),
                    _ => None,
                }
            }
        }
    }

    /// Largest month offset included, `None` when unbounded
    pub fn max_offset(&self) -> Option<u32> {
        match self {
            Self::CurrentMonth => Some(0),
            Self::LastMonths(n) => Some(*n),
            Self::All => None,
        }
    }

    /// Whether `date` falls into this period relative to `today`
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.max_offset() {
            Some(max) => months_ago(date, today) <= max,
            None => true,
        }
    }

    /// Earliest date covered, `None` when unbounded
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let max = i64::from(self.max_offset()?);
        let total = i64::from(today.year()) * 12 + i64::from(today.month0()) - max;
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        NaiveDate::from_ymd_opt(year, total.rem_euclid(12) as u32 + 1, 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentMonth => write!(f, "current month"),
            Self::LastMonths(1) => write!(f, "current and previous month"),
            Self::LastMonths(n) => write!(f, "current and {} previous months", n),
            Self::All => write!(f, "all time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_same_month_is_zero() {
        assert_eq!(months_ago(d(2026, 10, 1), d(2026, 10, 31)), 0);
        assert_eq!(months_ago(d(2026, 10, 31), d(2026, 10, 1)), 0);
    }

    #[test]
    fn test_previous_month_is_one_regardless_of_day() {
        assert_eq!(months_ago(d(2026, 9, 30), d(2026, 10, 1)), 1);
        assert_eq!(months_ago(d(2026, 9, 1), d(2026, 10, 31)), 1);
    }

    #[test]
    fn test_year_boundary() {
        assert_eq!(months_ago(d(2025, 12, 15), d(2026, 1, 2)), 1);
        assert_eq!(months_ago(d(2025, 10, 15), d(2026, 1, 2)), 3);
        assert_eq!(months_ago(d(2024, 1, 15), d(2026, 1, 2)), 24);
    }

    #[test]
    fn test_future_dates_bucket_to_current() {
        assert_eq!(months_ago(d(2026, 12, 1), d(2026, 10, 17)), 0);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2026, 1, 31), 1), d(2026, 2, 28));
        assert_eq!(add_months(d(2026, 11, 30), 3), d(2027, 2, 28));
        assert_eq!(add_months(d(2028, 1, 31), 1), d(2028, 2, 29));
        assert_eq!(add_months(d(2026, 5, 15), 12), d(2027, 5, 15));
    }

    #[test]
    fn test_add_months_on_day_restores_billing_day() {
        assert_eq!(add_months_on_day(d(2026, 1, 31), 1, 31), d(2026, 2, 28));
        assert_eq!(add_months_on_day(d(2026, 2, 28), 1, 31), d(2026, 3, 31));
        assert_eq!(add_months_on_day(d(2026, 3, 31), 1, 31), d(2026, 4, 30));
        assert_eq!(add_months_on_day(d(2026, 4, 30), 1, 31), d(2026, 5, 31));
        assert_eq!(add_months_on_day(d(2026, 4, 30), u32::MAX, 30), NaiveDate::MAX);
    }

    #[test]
    fn test_period_parse_and_contains() {
        let today = d(2026, 1, 10);
        assert_eq!(Period::parse("current"), Some(Period::CurrentMonth));
        assert_eq!(Period::parse("3"), Some(Period::LastMonths(3)));
        assert_eq!(Period::parse("2m"), Some(Period::LastMonths(2)));
        assert_eq!(Period::parse("all"), Some(Period::All));
        assert_eq!(Period::parse("yesterday"), None);
        assert_eq!(Period::parse("4"), None);
        assert_eq!(Period::parse("4000000000"), None);

        let one = Period::LastMonths(1);
        assert!(one.contains(d(2025, 12, 1), today));
        assert!(!one.contains(d(2025, 11, 30), today));
        assert!(Period::CurrentMonth.contains(d(2026, 1, 1), today));
        assert!(Period::All.contains(d(1999, 1, 1), today));
    }

    #[test]
    fn test_period_start_date() {
        let today = d(2026, 2, 14);
        assert_eq!(Period::CurrentMonth.start_date(today), Some(d(2026, 2, 1)));
        assert_eq!(Period::LastMonths(3).start_date(today), Some(d(2025, 11, 1)));
        assert_eq!(Period::All.start_date(today), None);
        assert_eq!(Period::LastMonths(24).start_date(today), Some(d(2024, 2, 1)));
        assert_eq!(Period::LastMonths(u32::MAX).start_date(today), None);
    }
}
