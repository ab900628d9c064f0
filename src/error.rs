//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while maintaining payroll records
//! and computing payslips.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Every fallible operation in the engine returns this error type. An
/// employee without an active salary structure is *not* an error; the
/// calculator reports that case as `Ok(None)`.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A record with the given identifier does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: String,
    },

    /// A write would violate a unique constraint of the store.
    #[error("Unique constraint violated on {entity}: {key}")]
    UniqueViolation {
        /// The kind of record being written.
        entity: &'static str,
        /// The duplicated key.
        key: String,
    },

    /// The payroll run is locked and its vouchers may no longer be cleared.
    #[error("Payroll run for {month} is locked")]
    RunLocked {
        /// The month of the locked run.
        month: NaiveDate,
    },

    /// The employee still has pending penalties for the run's month.
    #[error("Employee '{employee}' has pending penalties for {month}")]
    PendingPenalties {
        /// The username of the employee.
        employee: String,
        /// The month the penalties apply to.
        month: NaiveDate,
    },

    /// The request did not identify an acting user.
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Why the actor could not be resolved.
        message: String,
    },

    /// The actor lacks the capability required for the action.
    #[error("Permission denied: '{actor}' lacks {capability}")]
    PermissionDenied {
        /// The username of the actor.
        actor: String,
        /// The missing capability.
        capability: String,
    },

    /// Input data was invalid.
    #[error("Invalid field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The record store lock was poisoned by a panicking writer.
    #[error("Record store is unavailable")]
    StorePoisoned,
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

impl PayrollError {
    /// Shorthand for a [`PayrollError::NotFound`] error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        PayrollError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`PayrollError::InvalidInput`] error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        PayrollError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PayrollError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = PayrollError::not_found("Payslip", 42);
        assert_eq!(error.to_string(), "Payslip not found: 42");
    }

    #[test]
    fn test_unique_violation_displays_key() {
        let error = PayrollError::UniqueViolation {
            entity: "PayrollRun",
            key: "month=2026-03-01".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unique constraint violated on PayrollRun: month=2026-03-01"
        );
    }

    #[test]
    fn test_run_locked_displays_month() {
        let error = PayrollError::RunLocked {
            month: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        assert_eq!(error.to_string(), "Payroll run for 2026-03-01 is locked");
    }

    #[test]
    fn test_pending_penalties_displays_employee_and_month() {
        let error = PayrollError::PendingPenalties {
            employee: "jdoe".to_string(),
            month: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Employee 'jdoe' has pending penalties for 2026-03-01"
        );
    }

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = PayrollError::invalid("end_date", "must not precede start_date");
        assert_eq!(
            error.to_string(),
            "Invalid field 'end_date': must not precede start_date"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> PayrollResult<()> {
            Err(PayrollError::not_found("PayrollRun", 7))
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
