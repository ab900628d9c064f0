//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};
use crate::models::Employee;

use super::types::{AccessPolicy, EmployeeDirectory, PayrollSettings};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── payroll.yaml    # Organisation, default currency, bind address
/// ├── access.yaml     # Capability grants per role, group and business role
/// └── employees.yaml  # Employee directory seed
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Organisation: {}", loader.settings().organisation);
/// println!("Employees: {}", loader.employees().len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    settings: PayrollSettings,
    access: AccessPolicy,
    directory: EmployeeDirectory,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any of the three files is missing or contains
    /// invalid YAML.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), payroll_engine::error::PayrollError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<PayrollSettings>(&path.join("payroll.yaml"))?;
        let access = Self::load_yaml::<AccessPolicy>(&path.join("access.yaml"))?;
        let directory = Self::load_yaml::<EmployeeDirectory>(&path.join("employees.yaml"))?;

        Ok(Self {
            settings,
            access,
            directory,
        })
    }

    /// Builds a loader from already parsed parts.
    pub fn from_parts(
        settings: PayrollSettings,
        access: AccessPolicy,
        employees: Vec<Employee>,
    ) -> Self {
        Self {
            settings,
            access,
            directory: EmployeeDirectory { employees },
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the organisation settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the access policy.
    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }

    /// Returns the employee directory seed.
    pub fn employees(&self) -> &[Employee] {
        &self.directory.employees
    }

    /// Overrides the configured bind address.
    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.settings.bind_address = address.into();
        self
    }
}
