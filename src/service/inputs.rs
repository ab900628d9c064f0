//! Validated inputs for the compensation and penalty records.
//!
//! Each input carries the caller-editable fields of a record. Audit fields
//! (`created_by`, `created_at`, clearance attribution) are filled in by the
//! service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayItemKind, PenaltyStatus, RecordId};

/// Largest number of decimal places accepted for a money amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest number of significant digits accepted for a money amount.
pub const MONEY_DIGITS: u32 = 12;

fn validate_amount(field: &str, amount: Decimal) -> PayrollResult<()> {
    if amount < Decimal::ZERO {
        return Err(PayrollError::invalid(field, "must not be negative"));
    }
    // At most MONEY_DIGITS - MONEY_SCALE digits before the decimal point
    let limit = Decimal::from(10u64.pow(MONEY_DIGITS - MONEY_SCALE));
    if amount >= limit {
        return Err(PayrollError::invalid(
            field,
            format!("must be less than {}", limit),
        ));
    }
    if amount.normalize().scale() > MONEY_SCALE {
        return Err(PayrollError::invalid(
            field,
            format!("must have at most {} decimal places", MONEY_SCALE),
        ));
    }
    Ok(())
}

fn validate_required(field: &str, value: &str) -> PayrollResult<()> {
    if value.trim().is_empty() {
        return Err(PayrollError::invalid(field, "must not be blank"));
    }
    Ok(())
}

/// Fields of a salary structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryStructureInput {
    /// The employee the structure belongs to.
    pub employee_id: RecordId,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Legacy flat monthly allowances.
    pub allowances: Decimal,
    /// Legacy flat monthly deductions.
    pub deductions: Decimal,
    /// Currency code; the configured default when `None`.
    pub currency: Option<String>,
    /// First date the structure applies from. Informational.
    pub effective_from: Option<NaiveDate>,
    /// Inactive structures are skipped by payroll runs.
    pub is_active: bool,
}

impl SalaryStructureInput {
    /// Checks amounts and the currency code.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_amount("basic_salary", self.basic_salary)?;
        validate_amount("allowances", self.allowances)?;
        validate_amount("deductions", self.deductions)?;
        if let Some(currency) = &self.currency {
            validate_required("currency", currency)?;
            if currency.len() > 10 {
                return Err(PayrollError::invalid(
                    "currency",
                    "must be at most 10 characters",
                ));
            }
        }
        Ok(())
    }
}

/// Fields of a pay item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayItemTypeInput {
    /// Unique slug, e.g. `housing`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Allowance or deduction.
    pub kind: PayItemKind,
    /// Carried for reporting; not consulted by the tax calculation.
    pub taxable: bool,
    /// Inactive types contribute nothing.
    pub is_active: bool,
}

impl PayItemTypeInput {
    /// Checks the code is a slug and the name is present.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_required("code", &self.code)?;
        let is_slug = self
            .code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !is_slug {
            return Err(PayrollError::invalid(
                "code",
                "may only contain letters, digits, hyphens and underscores",
            ));
        }
        if self.code.len() > 60 {
            return Err(PayrollError::invalid("code", "must be at most 60 characters"));
        }
        validate_required("name", &self.name)
    }
}

/// Fields of an employee pay item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeePayItemInput {
    /// The employee receiving or paying the item.
    pub employee_id: RecordId,
    /// The item's type.
    pub item_type_id: RecordId,
    /// Monthly amount.
    pub amount: Decimal,
    /// First day of validity, open when `None`.
    pub start_date: Option<NaiveDate>,
    /// Last day of validity, open when `None`.
    pub end_date: Option<NaiveDate>,
    /// Informational.
    pub is_recurring: bool,
    /// Inactive items contribute nothing.
    pub is_active: bool,
}

impl EmployeePayItemInput {
    /// Checks the amount and the validity window.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_amount("amount", self.amount)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(PayrollError::invalid(
                    "end_date",
                    "must not be before start_date",
                ));
            }
        }
        Ok(())
    }
}

/// Fields of a penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyInput {
    /// The penalized employee.
    pub employee_id: RecordId,
    /// Department name, informational.
    pub department: Option<String>,
    /// Date of the incident; today when `None`.
    pub incident_date: Option<NaiveDate>,
    /// Any date within the month the penalty applies to.
    pub applies_to_month: NaiveDate,
    /// Amount deducted once cleared.
    pub amount: Decimal,
    /// Why the penalty was raised.
    pub reason: String,
    /// Settlement status.
    pub status: PenaltyStatus,
    /// Notes recorded on settlement.
    pub clearance_notes: String,
}

impl PenaltyInput {
    /// Checks the amount and reason.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_amount("amount", self.amount)?;
        validate_required("reason", &self.reason)
    }
}
