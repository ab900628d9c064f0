//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::access::Capability;
use crate::models::{Employee, Role};

fn default_currency() -> String {
    "UGX".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Organisation-wide payroll settings from `payroll.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollSettings {
    /// The organisation the payroll is run for.
    pub organisation: String,
    /// Currency assigned to salary structures that do not name one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            organisation: String::new(),
            default_currency: default_currency(),
            bind_address: default_bind_address(),
        }
    }
}

/// Capability grants from `access.yaml`.
///
/// Grants are keyed by coarse role, by group name and by business role
/// code. The default policy gives every capability to HR administrators:
/// the `SUPER_ADMIN` and `HR_MANAGER` roles, the "Super Admin" and
/// "HR Manager" groups, and the "super-admin" and "hr-manager" business
/// roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessPolicy {
    /// Capabilities granted per coarse role.
    #[serde(default)]
    pub roles: BTreeMap<Role, Vec<Capability>>,
    /// Capabilities granted per group name.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<Capability>>,
    /// Capabilities granted per active business role code.
    #[serde(default)]
    pub business_roles: BTreeMap<String, Vec<Capability>>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        let all = Capability::ALL.to_vec();
        Self {
            roles: BTreeMap::from([
                (Role::SuperAdmin, all.clone()),
                (Role::HrManager, all.clone()),
            ]),
            groups: BTreeMap::from([
                ("Super Admin".to_string(), all.clone()),
                ("HR Manager".to_string(), all.clone()),
            ]),
            business_roles: BTreeMap::from([
                ("super-admin".to_string(), all.clone()),
                ("hr-manager".to_string(), all),
            ]),
        }
    }
}

/// Employee directory seed from `employees.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmployeeDirectory {
    /// The employees to load into the record store.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: PayrollSettings = serde_yaml::from_str("organisation: Acme").unwrap();
        assert_eq!(settings.organisation, "Acme");
        assert_eq!(settings.default_currency, "UGX");
        assert_eq!(settings.bind_address, "127.0.0.1:8080");
    }

    #[test]
    fn test_access_policy_parses_role_keys() {
        let yaml = r#"
roles:
  HR_MANAGER: [view_payroll, clear_vouchers]
groups:
  Payroll Clerks: [view_payroll]
"#;
        let policy: AccessPolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            policy.roles.get(&Role::HrManager),
            Some(&vec![Capability::ViewPayroll, Capability::ClearVouchers])
        );
        assert_eq!(policy.groups.len(), 1);
        assert!(policy.business_roles.is_empty());
    }

    #[test]
    fn test_default_policy_covers_hr_admins() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.roles.get(&Role::HrManager).map(Vec::len), Some(6));
        assert!(!policy.roles.contains_key(&Role::Supervisor));
        assert!(policy.groups.contains_key("Super Admin"));
        assert!(policy.business_roles.contains_key("hr-manager"));
    }
}
