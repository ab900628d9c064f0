//! Calendar month arithmetic for payroll periods.
//!
//! Payroll runs and penalties are keyed by the first day of their month.
//! These helpers normalize arbitrary dates to that key and compute the
//! inclusive bounds of a month.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::{PayrollError, PayrollResult};

/// Normalizes a date to the first day of its month.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::first_of_month;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
/// assert_eq!(first_of_month(date), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
/// ```
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Returns the first and last calendar day of the month containing `month`.
///
/// # Errors
///
/// Returns `InvalidInput` if the month lies at the edge of the representable
/// date range.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::month_bounds;
/// use chrono::NaiveDate;
///
/// let (start, end) = month_bounds(NaiveDate::from_ymd_opt(2028, 2, 1).unwrap()).unwrap();
/// assert_eq!(start, NaiveDate::from_ymd_opt(2028, 2, 1).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());
/// ```
pub fn month_bounds(month: NaiveDate) -> PayrollResult<(NaiveDate, NaiveDate)> {
    let start = first_of_month(month);
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| PayrollError::invalid("month", format!("{} is out of range", month)))?;
    Ok((start, end))
}

/// Formats a month as `YYYYMM`, the period segment of voucher numbers.
pub fn period_code(month: NaiveDate) -> String {
    month.format("%Y%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_of_month_is_identity_on_day_one() {
        assert_eq!(first_of_month(date(2026, 3, 1)), date(2026, 3, 1));
    }

    #[test]
    fn test_first_of_month_from_last_day() {
        assert_eq!(first_of_month(date(2026, 12, 31)), date(2026, 12, 1));
    }

    #[test]
    fn test_month_bounds_thirty_one_day_month() {
        assert_eq!(
            month_bounds(date(2026, 3, 1)).unwrap(),
            (date(2026, 3, 1), date(2026, 3, 31))
        );
    }

    #[test]
    fn test_month_bounds_february_non_leap_year() {
        assert_eq!(
            month_bounds(date(2026, 2, 14)).unwrap(),
            (date(2026, 2, 1), date(2026, 2, 28))
        );
    }

    #[test]
    fn test_month_bounds_december_rolls_into_next_year() {
        assert_eq!(
            month_bounds(date(2026, 12, 1)).unwrap(),
            (date(2026, 12, 1), date(2026, 12, 31))
        );
    }

    #[test]
    fn test_month_bounds_at_end_of_range_is_error() {
        let result = month_bounds(NaiveDate::MAX);
        assert!(matches!(result, Err(PayrollError::InvalidInput { .. })));
    }

    #[test]
    fn test_period_code() {
        assert_eq!(period_code(date(2026, 3, 1)), "202603");
        assert_eq!(period_code(date(2026, 11, 1)), "202611");
    }
}
