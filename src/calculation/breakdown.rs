//! Payslip breakdown calculation.
//!
//! Combines the salary structure with itemized pay items and penalties into
//! the gross, tax and net figures of a payslip.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{PayrollError, PayrollResult};
use crate::models::SalaryStructure;

use super::pay_items::PayItemTotals;
use super::penalties::PenaltySummary;
use super::tax::{calculate_tax, taxable_base};

/// The computed figures of a payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayslipBreakdown {
    /// Basic salary from the structure.
    pub basic_salary: Decimal,
    /// Legacy flat allowances plus itemized allowances.
    pub allowance_total: Decimal,
    /// Legacy flat deductions plus itemized deductions.
    pub deduction_total: Decimal,
    /// Cleared penalties for the month.
    pub penalty_total: Decimal,
    /// Basic salary plus all allowances.
    pub gross_pay: Decimal,
    /// Gross pay less deductions and penalties, floored at zero.
    pub taxable_base: Decimal,
    /// Statutory tax on the taxable base.
    pub tax_amount: Decimal,
    /// Gross pay less deductions, penalties and tax.
    pub net_pay: Decimal,
    /// Whether the voucher must be held for pending penalties.
    pub is_held: bool,
}

impl PayslipBreakdown {
    /// Deductions and penalties combined.
    pub fn total_deductions(&self) -> Decimal {
        self.deduction_total + self.penalty_total
    }
}

/// Calculates the payslip figures for a salary structure.
///
/// Legacy flat amounts on the structure and itemized pay items both
/// contribute to the totals. Sums that overflow the decimal range are
/// reported as [`PayrollError::InvalidInput`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_breakdown, PayItemTotals, PenaltySummary};
/// use payroll_engine::models::SalaryStructure;
/// use rust_decimal::Decimal;
///
/// let structure = SalaryStructure {
///     id: 1,
///     employee_id: 1,
///     basic_salary: Decimal::new(1_000_000, 0),
///     allowances: Decimal::ZERO,
///     deductions: Decimal::ZERO,
///     currency: "UGX".to_string(),
///     effective_from: None,
///     is_active: true,
/// };
///
/// let breakdown = calculate_breakdown(
///     &structure,
///     &PayItemTotals::default(),
///     &PenaltySummary::default(),
/// )
/// .unwrap();
/// assert_eq!(breakdown.gross_pay, Decimal::new(1_000_000, 0));
/// assert_eq!(breakdown.tax_amount, Decimal::new(100_000, 0));
/// assert_eq!(breakdown.net_pay, Decimal::new(900_000, 0));
/// assert!(!breakdown.is_held);
/// ```
pub fn calculate_breakdown(
    structure: &SalaryStructure,
    items: &PayItemTotals,
    penalties: &PenaltySummary,
) -> PayrollResult<PayslipBreakdown> {
    let allowance_total = in_range(
        "allowance_total",
        structure.allowances.checked_add(items.allowance_total),
    )?;
    let deduction_total = in_range(
        "deduction_total",
        structure.deductions.checked_add(items.deduction_total),
    )?;
    let penalty_total = penalties.penalty_total;

    let gross_pay = in_range(
        "gross_pay",
        structure.basic_salary.checked_add(allowance_total),
    )?;
    let deductions = in_range("deduction_total", deduction_total.checked_add(penalty_total))?;
    let tax_amount = calculate_tax(gross_pay, deductions);
    let net_pay = in_range(
        "net_pay",
        gross_pay
            .checked_sub(deductions)
            .and_then(|pay| pay.checked_sub(tax_amount)),
    )?;

    Ok(PayslipBreakdown {
        basic_salary: structure.basic_salary,
        allowance_total,
        deduction_total,
        penalty_total,
        gross_pay,
        taxable_base: taxable_base(gross_pay, deductions),
        tax_amount,
        net_pay,
        is_held: penalties.penalties_pending,
    })
}

fn in_range(field: &str, value: Option<Decimal>) -> PayrollResult<Decimal> {
    value.ok_or_else(|| PayrollError::invalid(field, "amount exceeds the supported range"))
}
