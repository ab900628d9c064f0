//! Salary voucher numbering.

use chrono::NaiveDate;

use crate::models::Employee;

use super::month::period_code;

/// Prefix of every salary voucher number.
pub const VOUCHER_PREFIX: &str = "SV";

/// Returns the identifier used in an employee's voucher numbers.
///
/// The HR-assigned employee ID is preferred; employees without one are
/// identified by their username.
pub fn employee_identifier(employee: &Employee) -> &str {
    employee.hr_employee_id().unwrap_or(&employee.username)
}

/// Builds the deterministic voucher number `SV-<YYYYMM>-<identifier>`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::voucher_number;
/// use payroll_engine::models::{Employee, EmployeeProfile, Role};
/// use chrono::NaiveDate;
///
/// let employee = Employee {
///     id: 3,
///     username: "okello".to_string(),
///     full_name: "Peter Okello".to_string(),
///     role: Role::Staff,
///     is_superuser: false,
///     groups: vec![],
///     department_roles: vec![],
///     profile: Some(EmployeeProfile {
///         employee_id: "EMP-003".to_string(),
///         ..Default::default()
///     }),
/// };
/// let month = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(voucher_number(month, &employee), "SV-202603-EMP-003");
/// ```
pub fn voucher_number(month: NaiveDate, employee: &Employee) -> String {
    format!(
        "{}-{}-{}",
        VOUCHER_PREFIX,
        period_code(month),
        employee_identifier(employee)
    )
}
