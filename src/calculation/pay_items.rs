//! Pay item aggregation.
//!
//! Sums the itemized allowances and deductions that apply to an employee
//! for a payroll month.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{EmployeePayItem, PayItemKind, PayItemType};

/// Itemized totals for one employee and month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayItemTotals {
    /// Sum of applicable allowance items.
    pub allowance_total: Decimal,
    /// Sum of applicable deduction items.
    pub deduction_total: Decimal,
    /// Number of items that contributed.
    pub items_applied: usize,
}

/// Sums pay items applying to the month `[month_start, month_end]`.
///
/// An item contributes when it is active, its type is active, and its
/// validity window overlaps the month. The type's `taxable` flag is not
/// consulted.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::sum_pay_items;
/// use payroll_engine::models::{EmployeePayItem, PayItemKind, PayItemType};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let housing = PayItemType {
///     id: 1,
///     code: "housing".to_string(),
///     name: "Housing".to_string(),
///     kind: PayItemKind::Allowance,
///     taxable: true,
///     is_active: true,
/// };
/// let item = EmployeePayItem {
///     id: 10,
///     employee_id: 3,
///     item_type_id: 1,
///     amount: Decimal::new(200_000, 0),
///     start_date: None,
///     end_date: None,
///     is_recurring: true,
///     is_active: true,
///     created_by: None,
///     created_at: Utc::now(),
/// };
///
/// let totals = sum_pay_items(
///     [(&item, &housing)],
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// );
/// assert_eq!(totals.allowance_total, Decimal::new(200_000, 0));
/// assert_eq!(totals.deduction_total, Decimal::ZERO);
/// ```
pub fn sum_pay_items<'a, I>(items: I, month_start: NaiveDate, month_end: NaiveDate) -> PayItemTotals
where
    I: IntoIterator<Item = (&'a EmployeePayItem, &'a PayItemType)>,
{
    items
        .into_iter()
        .filter(|(item, item_type)| {
            item.is_active && item_type.is_active && item.overlaps(month_start, month_end)
        })
        .fold(PayItemTotals::default(), |mut totals, (item, item_type)| {
            match item_type.kind {
                PayItemKind::Allowance => totals.allowance_total += item.amount,
                PayItemKind::Deduction => totals.deduction_total += item.amount,
            }
            totals.items_applied += 1;
            totals
        })
}
