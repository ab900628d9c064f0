//! Core data models for the payroll engine.
//!
//! This module contains all the domain records persisted by the record
//! store and read or written by the payslip calculator.

mod compensation;
mod employee;
mod payroll_run;
mod payslip;
mod penalty;

pub use compensation::{EmployeePayItem, PayItemKind, PayItemType, SalaryStructure};
pub use employee::{DepartmentRole, Employee, EmployeeProfile, Role};
pub use payroll_run::{PayrollRun, PayrollRunDetail, PayslipEntry, VoucherExport};
pub use payslip::{Payslip, SalaryVoucher, VoucherExportRow, VoucherStatus};
pub use penalty::{Penalty, PenaltyStatus};

/// Primary key of a stored record.
pub type RecordId = u64;
