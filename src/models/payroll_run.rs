//! Payroll run model.
//!
//! A [`PayrollRun`] is a month-scoped batch computation. Exactly one run may
//! exist per calendar month and its month is always stored as the first day
//! of that month.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Payslip, RecordId, SalaryVoucher, VoucherExportRow};

/// A single month-scoped payroll computation event.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollRun;
/// use chrono::{NaiveDate, Utc};
///
/// let run = PayrollRun {
///     id: 1,
///     month: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     created_by: Some(2),
///     created_at: Utc::now(),
///     locked: false,
/// };
/// assert_eq!(run.period_label(), "2026-03");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: RecordId,
    /// The first day of the run's month.
    pub month: NaiveDate,
    /// The actor who created the run.
    pub created_by: Option<RecordId>,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
    /// Locked runs reject further voucher clearance.
    pub locked: bool,
}

impl PayrollRun {
    /// Returns the run's month formatted as `YYYY-MM`.
    pub fn period_label(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }
}

/// A payslip of a run together with its voucher and employee names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipEntry {
    /// The employee's login handle.
    pub username: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The payslip.
    pub payslip: Payslip,
    /// The voucher gating the payslip's release.
    pub voucher: Option<SalaryVoucher>,
}

/// The cleared-voucher bank export of a run, read from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherExport {
    /// The exported run.
    pub run: PayrollRun,
    /// One row per cleared voucher, ordered by username.
    pub rows: Vec<VoucherExportRow>,
}

/// A payroll run with all of its payslips ordered by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunDetail {
    /// The run.
    pub run: PayrollRun,
    /// The run's payslips.
    pub payslips: Vec<PayslipEntry>,
}
