//! Employee model and related types.
//!
//! This module defines the Employee struct, the HR profile that carries the
//! HR-assigned identifier and bank details, and the Role enum used by the
//! access layer.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// The coarse role assigned to every user account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full administrative access.
    SuperAdmin,
    /// Human-resources manager.
    HrManager,
    /// Line supervisor.
    Supervisor,
    /// Regular staff member.
    #[default]
    Staff,
}

/// A department-scoped business role held by an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRole {
    /// The business role code (e.g., "hr-manager").
    pub code: String,
    /// The department the role is held in.
    #[serde(default)]
    pub department: Option<String>,
    /// Whether the assignment is currently in force.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// HR profile of an employee.
///
/// Carries the HR-assigned employee identifier and the bank details used
/// when vouchers are released for disbursement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// The HR-assigned employee identifier (e.g., "EMP-0042").
    pub employee_id: String,
    /// The name of the employee's bank.
    #[serde(default)]
    pub bank_name: String,
    /// The employee's bank account number.
    #[serde(default)]
    pub bank_account_number: String,
    /// The branch holding the account.
    #[serde(default)]
    pub bank_branch: String,
}

/// Represents a user account that may be paid through payroll and may act
/// on payroll records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee record.
    #[serde(default)]
    pub id: RecordId,
    /// The login handle.
    pub username: String,
    /// The employee's full name, possibly empty.
    #[serde(default)]
    pub full_name: String,
    /// The coarse account role.
    #[serde(default)]
    pub role: Role,
    /// Superusers bypass every capability check.
    #[serde(default)]
    pub is_superuser: bool,
    /// Names of the permission groups the account belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Department-scoped business roles.
    #[serde(default)]
    pub department_roles: Vec<DepartmentRole>,
    /// The HR profile, absent for accounts without one.
    #[serde(default)]
    pub profile: Option<EmployeeProfile>,
}

fn default_true() -> bool {
    true
}

impl Employee {
    /// Returns the full name, falling back to the username when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, Role};
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     username: "jdoe".to_string(),
    ///     full_name: String::new(),
    ///     role: Role::Staff,
    ///     is_superuser: false,
    ///     groups: vec![],
    ///     department_roles: vec![],
    ///     profile: None,
    /// };
    /// assert_eq!(employee.display_name(), "jdoe");
    /// ```
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() { &self.username } else { name }
    }

    /// Returns the HR-assigned employee identifier, if one is recorded.
    pub fn hr_employee_id(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .map(|p| p.employee_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(profile: Option<EmployeeProfile>) -> Employee {
        Employee {
            id: 7,
            username: "amugisha".to_string(),
            full_name: "Amina Mugisha".to_string(),
            role: Role::Staff,
            is_superuser: false,
            groups: vec![],
            department_roles: vec![],
            profile,
        }
    }

    #[test]
    fn test_deserialize_minimal_employee() {
        let json = r#"{ "id": 3, "username": "okello" }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, 3);
        assert_eq!(employee.role, Role::Staff);
        assert!(!employee.is_superuser);
        assert!(employee.profile.is_none());
    }

    #[test]
    fn test_deserialize_employee_with_profile_and_roles() {
        let json = r#"{
            "id": 4,
            "username": "nakato",
            "full_name": "Grace Nakato",
            "role": "HR_MANAGER",
            "groups": ["HR Manager"],
            "department_roles": [{ "code": "hr-manager", "department": "HR" }],
            "profile": {
                "employee_id": "EMP-004",
                "bank_name": "Stanbic",
                "bank_account_number": "9030001234",
                "bank_branch": "Kampala Road"
            }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.role, Role::HrManager);
        assert!(employee.department_roles[0].is_active);
        assert_eq!(employee.hr_employee_id(), Some("EMP-004"));
        assert_eq!(employee.profile.unwrap().bank_branch, "Kampala Road");
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let employee = create_test_employee(None);
        assert_eq!(employee.display_name(), "Amina Mugisha");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut employee = create_test_employee(None);
        employee.full_name = "   ".to_string();
        assert_eq!(employee.display_name(), "amugisha");
    }

    #[test]
    fn test_hr_employee_id_ignores_blank_identifier() {
        let employee = create_test_employee(Some(EmployeeProfile::default()));
        assert_eq!(employee.hr_employee_id(), None);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"SUPER_ADMIN\""
        );
        assert_eq!(
            serde_json::to_string(&Role::HrManager).unwrap(),
            "\"HR_MANAGER\""
        );
    }
}
