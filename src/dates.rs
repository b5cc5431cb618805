//! Calendar helpers shared by the loan and projection modules

use chrono::{Datelike, Months, NaiveDate};

/// Add whole months to a date, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29). Saturates at the chrono range limit.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

/// Whole-month distance from `start` to `end`, ignoring day-of-month.
/// Negative when `end` is in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32
}

/// True when both dates fall in the same calendar month
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2025, 11, 15), 3), d(2026, 2, 15));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(d(2025, 1, 1), d(2025, 1, 31)), 0);
        assert_eq!(months_between(d(2025, 1, 15), d(2026, 1, 1)), 12);
        assert_eq!(months_between(d(2025, 6, 1), d(2025, 3, 1)), -3);
    }
}
