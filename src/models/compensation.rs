//! Compensation models: salary structures and recurring pay items.
//!
//! A [`SalaryStructure`] fixes an employee's basic salary together with the
//! legacy flat allowance and deduction amounts. [`EmployeePayItem`]s attach
//! itemized allowances or deductions of a given [`PayItemType`], optionally
//! bounded by a validity window.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// The salary structure of a single employee.
///
/// At most one structure exists per employee. Structures that are not
/// active make the employee ineligible for payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Unique identifier for the structure.
    pub id: RecordId,
    /// The employee the structure belongs to.
    pub employee_id: RecordId,
    /// The monthly basic salary.
    pub basic_salary: Decimal,
    /// Legacy flat monthly allowance.
    pub allowances: Decimal,
    /// Legacy flat monthly deduction.
    pub deductions: Decimal,
    /// ISO currency code of the amounts.
    pub currency: String,
    /// The date the structure takes effect, informational only.
    pub effective_from: Option<NaiveDate>,
    /// Whether the employee is currently payroll-eligible.
    pub is_active: bool,
}

/// Whether a pay item adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayItemKind {
    /// Adds to gross pay.
    Allowance,
    /// Reduces pay before tax.
    Deduction,
}

/// A category of recurring pay adjustment (e.g., "housing", "sacco").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayItemType {
    /// Unique identifier for the type.
    pub id: RecordId,
    /// Unique slug for the type.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Allowance or deduction.
    pub kind: PayItemKind,
    /// Recorded for reporting; the tax computation does not consult it.
    pub taxable: bool,
    /// Inactive types contribute nothing to payslips.
    pub is_active: bool,
}

/// An amount of a given pay item type attached to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayItem {
    /// Unique identifier for the item.
    pub id: RecordId,
    /// The employee the item is attached to.
    pub employee_id: RecordId,
    /// The type of the item.
    pub item_type_id: RecordId,
    /// The monthly amount.
    pub amount: Decimal,
    /// First day the item applies, open-ended when absent.
    pub start_date: Option<NaiveDate>,
    /// Last day the item applies, open-ended when absent.
    pub end_date: Option<NaiveDate>,
    /// Whether the item repeats every month.
    pub is_recurring: bool,
    /// Inactive items contribute nothing to payslips.
    pub is_active: bool,
    /// The actor who created the item.
    pub created_by: Option<RecordId>,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl EmployeePayItem {
    /// Checks whether the item's validity window overlaps `[start, end]`.
    ///
    /// Missing bounds are open-ended. The item's `is_active` flag is not
    /// consulted here.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::EmployeePayItem;
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    ///
    /// let item = EmployeePayItem {
    ///     id: 1,
    ///     employee_id: 1,
    ///     item_type_id: 1,
    ///     amount: Decimal::new(50_000, 0),
    ///     start_date: NaiveDate::from_ymd_opt(2026, 3, 20),
    ///     end_date: None,
    ///     is_recurring: true,
    ///     is_active: true,
    ///     created_by: None,
    ///     created_at: Utc::now(),
    /// };
    ///
    /// let march = (
    ///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    /// );
    /// let february = (
    ///     NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
    /// );
    /// assert!(item.overlaps(march.0, march.1));
    /// assert!(!item.overlaps(february.0, february.1));
    /// ```
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let starts_in_time = self.start_date.is_none_or(|s| s <= end);
        let ends_in_time = self.end_date.is_none_or(|e| e >= start);
        starts_in_time && ends_in_time
    }

    /// Checks whether the item applies on a single date.
    pub fn applies_to_date(&self, date: NaiveDate) -> bool {
        self.is_active && self.overlaps(date, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_item(start: Option<NaiveDate>, end: Option<NaiveDate>) -> EmployeePayItem {
        EmployeePayItem {
            id: 1,
            employee_id: 10,
            item_type_id: 20,
            amount: Decimal::from_str("150000.00").unwrap(),
            start_date: start,
            end_date: end,
            is_recurring: true,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_ended_item_overlaps_any_month() {
        let item = create_item(None, None);
        assert!(item.overlaps(date(1999, 1, 1), date(1999, 1, 31)));
        assert!(item.overlaps(date(2026, 3, 1), date(2026, 3, 31)));
    }

    #[test]
    fn test_item_ending_on_month_start_overlaps() {
        let item = create_item(None, Some(date(2026, 3, 1)));
        assert!(item.overlaps(date(2026, 3, 1), date(2026, 3, 31)));
    }

    #[test]
    fn test_item_starting_on_month_end_overlaps() {
        let item = create_item(Some(date(2026, 3, 31)), None);
        assert!(item.overlaps(date(2026, 3, 1), date(2026, 3, 31)));
    }

    #[test]
    fn test_item_ended_before_month_does_not_overlap() {
        let item = create_item(Some(date(2026, 1, 1)), Some(date(2026, 2, 28)));
        assert!(!item.overlaps(date(2026, 3, 1), date(2026, 3, 31)));
    }

    #[test]
    fn test_applies_to_date_requires_active() {
        let mut item = create_item(None, None);
        assert!(item.applies_to_date(date(2026, 3, 15)));
        item.is_active = false;
        assert!(!item.applies_to_date(date(2026, 3, 15)));
    }

    #[test]
    fn test_pay_item_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&PayItemKind::Allowance).unwrap(),
            "\"ALLOWANCE\""
        );
        let kind: PayItemKind = serde_json::from_str("\"DEDUCTION\"").unwrap();
        assert_eq!(kind, PayItemKind::Deduction);
    }
}
