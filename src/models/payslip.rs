//! Payslip and salary voucher models.
//!
//! This module contains the [`Payslip`] snapshot produced by the calculator,
//! the [`SalaryVoucher`] that gates its release for disbursement, and the
//! [`VoucherExportRow`] handed to the bank export.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Computed pay breakdown for one employee within one payroll run.
///
/// Exactly one payslip exists per (run, employee). The totals satisfy
/// `net_pay = gross_pay - deduction_total - penalty_total - tax_amount`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Payslip;
/// use rust_decimal::Decimal;
///
/// let payslip = Payslip {
///     id: 1,
///     payroll_run_id: 1,
///     employee_id: 3,
///     basic_salary: Decimal::new(1_000_000, 0),
///     allowance_total: Decimal::ZERO,
///     deduction_total: Decimal::ZERO,
///     penalty_total: Decimal::ZERO,
///     gross_pay: Decimal::new(1_000_000, 0),
///     tax_amount: Decimal::new(100_000, 0),
///     net_pay: Decimal::new(900_000, 0),
///     is_held: false,
/// };
/// assert_eq!(payslip.total_deductions(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique identifier for the payslip.
    pub id: RecordId,
    /// The run the payslip belongs to.
    pub payroll_run_id: RecordId,
    /// The paid employee.
    pub employee_id: RecordId,
    /// Basic salary from the salary structure.
    pub basic_salary: Decimal,
    /// Legacy flat allowances plus itemized allowances.
    pub allowance_total: Decimal,
    /// Legacy flat deductions plus itemized deductions.
    pub deduction_total: Decimal,
    /// Cleared penalties for the run's month.
    pub penalty_total: Decimal,
    /// Basic salary plus all allowances.
    pub gross_pay: Decimal,
    /// Statutory tax withheld.
    pub tax_amount: Decimal,
    /// Pay after deductions, penalties and tax.
    pub net_pay: Decimal,
    /// Held while penalties for the month are pending.
    pub is_held: bool,
}

impl Payslip {
    /// Returns deductions plus penalties, the amount subtracted before tax.
    pub fn total_deductions(&self) -> Decimal {
        self.deduction_total + self.penalty_total
    }
}

/// Release status of a salary voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoucherStatus {
    /// Held until penalty clearance is completed.
    OnHold,
    /// Released for disbursement.
    Cleared,
}

/// The release gate for a payslip's net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryVoucher {
    /// Unique identifier for the voucher.
    pub id: RecordId,
    /// The payslip the voucher belongs to, one-to-one.
    pub payslip_id: RecordId,
    /// Globally unique voucher number, `SV-<YYYYMM>-<identifier>`.
    pub voucher_number: String,
    /// Current release status.
    pub status: VoucherStatus,
    /// The actor who cleared the voucher.
    pub cleared_by: Option<RecordId>,
    /// When the voucher was cleared.
    pub cleared_at: Option<DateTime<Utc>>,
    /// Free-form notes recorded at clearance.
    pub clearance_notes: String,
    /// When the voucher was first created.
    pub created_at: DateTime<Utc>,
}

impl SalaryVoucher {
    /// Returns true if the voucher has been released.
    pub fn is_cleared(&self) -> bool {
        self.status == VoucherStatus::Cleared
    }
}

/// One row of the cleared-voucher bank export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherExportRow {
    /// The employee's full name, or username when blank.
    pub employee_name: String,
    /// The HR-assigned employee identifier, empty without a profile.
    pub employee_id: String,
    /// Bank name.
    pub bank_name: String,
    /// Bank account number.
    pub account_number: String,
    /// Bank branch.
    pub branch: String,
    /// Net pay to disburse.
    pub net_pay: Decimal,
    /// The voucher number.
    pub voucher_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_total_deductions_includes_penalties() {
        let payslip = Payslip {
            id: 1,
            payroll_run_id: 1,
            employee_id: 1,
            basic_salary: dec("1000000"),
            allowance_total: dec("0"),
            deduction_total: dec("20000"),
            penalty_total: dec("50000"),
            gross_pay: dec("1000000"),
            tax_amount: dec("93000.00"),
            net_pay: dec("837000.00"),
            is_held: false,
        };
        assert_eq!(payslip.total_deductions(), dec("70000"));
    }

    #[test]
    fn test_voucher_status_serialization() {
        assert_eq!(
            serde_json::to_string(&VoucherStatus::OnHold).unwrap(),
            "\"ON_HOLD\""
        );
        assert_eq!(
            serde_json::to_string(&VoucherStatus::Cleared).unwrap(),
            "\"CLEARED\""
        );
    }

    #[test]
    fn test_payslip_amounts_serialize_as_strings() {
        let payslip = Payslip {
            id: 1,
            payroll_run_id: 1,
            employee_id: 1,
            basic_salary: dec("1000000"),
            allowance_total: dec("0"),
            deduction_total: dec("0"),
            penalty_total: dec("0"),
            gross_pay: dec("1000000"),
            tax_amount: dec("100000.00"),
            net_pay: dec("900000.00"),
            is_held: false,
        };
        let json = serde_json::to_string(&payslip).unwrap();
        assert!(json.contains("\"net_pay\":\"900000.00\""));
        assert!(json.contains("\"is_held\":false"));
    }
}
