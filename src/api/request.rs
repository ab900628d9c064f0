//! Request types for the payroll API.
//!
//! This module defines the JSON request bodies and their conversion into
//! the service's input types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayItemKind, PenaltyStatus, RecordId};
use crate::service::{EmployeePayItemInput, PayItemTypeInput, PenaltyInput, SalaryStructureInput};

fn default_true() -> bool {
    true
}

/// Request body for `POST /payroll-runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayrollRunRequest {
    /// Any date within the month to run payroll for.
    pub month: NaiveDate,
}

/// Optional request body for `POST /payslips/:id/clear-voucher`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearVoucherRequest {
    /// Notes recorded on the voucher.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for creating or replacing a salary structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStructureRequest {
    /// The employee the structure belongs to.
    pub employee_id: RecordId,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Legacy flat monthly allowances.
    #[serde(default)]
    pub allowances: Decimal,
    /// Legacy flat monthly deductions.
    #[serde(default)]
    pub deductions: Decimal,
    /// Currency code; the organisation default when omitted.
    #[serde(default)]
    pub currency: Option<String>,
    /// First date the structure applies from.
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    /// Whether the employee is included in payroll runs.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request body for creating or replacing a pay item type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayItemTypeRequest {
    /// Unique slug.
    pub code: String,
    /// Display name.
    pub name: String,
    /// `ALLOWANCE` or `DEDUCTION`.
    pub kind: PayItemKind,
    /// Whether the item is taxable.
    #[serde(default = "default_true")]
    pub taxable: bool,
    /// Whether items of this type contribute to payslips.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request body for creating or replacing an employee pay item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeePayItemRequest {
    /// The employee.
    pub employee_id: RecordId,
    /// The pay item type.
    pub item_type_id: RecordId,
    /// Monthly amount.
    pub amount: Decimal,
    /// First day of validity.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of validity.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Whether the item recurs monthly.
    #[serde(default = "default_true")]
    pub is_recurring: bool,
    /// Whether the item contributes to payslips.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request body for creating or replacing a penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyRequest {
    /// The penalized employee.
    pub employee_id: RecordId,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Date of the incident; today when omitted.
    #[serde(default)]
    pub incident_date: Option<NaiveDate>,
    /// Any date within the month the penalty applies to.
    pub applies_to_month: NaiveDate,
    /// Penalty amount.
    pub amount: Decimal,
    /// Why the penalty was raised.
    pub reason: String,
    /// `PENDING`, `CLEARED` or `WAIVED`.
    #[serde(default)]
    pub status: PenaltyStatus,
    /// Notes recorded on settlement.
    #[serde(default)]
    pub clearance_notes: String,
}

impl From<SalaryStructureRequest> for SalaryStructureInput {
    fn from(req: SalaryStructureRequest) -> Self {
        SalaryStructureInput {
            employee_id: req.employee_id,
            basic_salary: req.basic_salary,
            allowances: req.allowances,
            deductions: req.deductions,
            currency: req.currency,
            effective_from: req.effective_from,
            is_active: req.is_active,
        }
    }
}

impl From<PayItemTypeRequest> for PayItemTypeInput {
    fn from(req: PayItemTypeRequest) -> Self {
        PayItemTypeInput {
            code: req.code,
            name: req.name,
            kind: req.kind,
            taxable: req.taxable,
            is_active: req.is_active,
        }
    }
}

impl From<EmployeePayItemRequest> for EmployeePayItemInput {
    fn from(req: EmployeePayItemRequest) -> Self {
        EmployeePayItemInput {
            employee_id: req.employee_id,
            item_type_id: req.item_type_id,
            amount: req.amount,
            start_date: req.start_date,
            end_date: req.end_date,
            is_recurring: req.is_recurring,
            is_active: req.is_active,
        }
    }
}

impl From<PenaltyRequest> for PenaltyInput {
    fn from(req: PenaltyRequest) -> Self {
        PenaltyInput {
            employee_id: req.employee_id,
            department: req.department,
            incident_date: req.incident_date,
            applies_to_month: req.applies_to_month,
            amount: req.amount,
            reason: req.reason,
            status: req.status,
            clearance_notes: req.clearance_notes,
        }
    }
}
