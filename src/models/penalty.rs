//! Penalty model.
//!
//! Penalties are amounts attributed to an employee for a specific payroll
//! month. Only cleared penalties reduce pay; pending penalties hold the
//! employee's salary voucher until they are cleared or waived.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Lifecycle status of a penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PenaltyStatus {
    /// Awaiting clearance; holds the salary voucher.
    #[default]
    Pending,
    /// Confirmed; deducted from pay.
    Cleared,
    /// Forgiven; neither deducted nor holding.
    Waived,
}

impl PenaltyStatus {
    /// Returns true once the penalty has left the pending state.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PenaltyStatus;
    ///
    /// assert!(!PenaltyStatus::Pending.is_settled());
    /// assert!(PenaltyStatus::Cleared.is_settled());
    /// assert!(PenaltyStatus::Waived.is_settled());
    /// ```
    pub fn is_settled(self) -> bool {
        !matches!(self, PenaltyStatus::Pending)
    }
}

/// A penalty attributed to an employee for one payroll month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    /// Unique identifier for the penalty.
    pub id: RecordId,
    /// The penalized employee.
    pub employee_id: RecordId,
    /// The department that raised the penalty.
    pub department: Option<String>,
    /// The date of the incident.
    pub incident_date: NaiveDate,
    /// The payroll month the penalty applies to, always the first day.
    pub applies_to_month: NaiveDate,
    /// The penalty amount.
    pub amount: Decimal,
    /// Why the penalty was raised.
    pub reason: String,
    /// Current lifecycle status.
    pub status: PenaltyStatus,
    /// The actor who raised the penalty.
    pub created_by: Option<RecordId>,
    /// When the penalty was raised.
    pub created_at: DateTime<Utc>,
    /// The actor who cleared or waived the penalty.
    pub cleared_by: Option<RecordId>,
    /// When the penalty was cleared or waived.
    pub cleared_at: Option<DateTime<Utc>>,
    /// Free-form notes recorded at clearance.
    pub clearance_notes: String,
}

impl Penalty {
    /// Returns true if the penalty applies to the employee and month.
    pub fn applies_to(&self, employee_id: RecordId, month: NaiveDate) -> bool {
        self.employee_id == employee_id && self.applies_to_month == month
    }
}
