//! Record store for payroll data.
//!
//! The store keeps every table in memory behind a mutex. Writes happen inside
//! [`RecordStore::transaction`], which hands the closure a working copy of the
//! tables and commits it only when the closure returns `Ok`. Unique
//! constraints (one run per month, one payslip per run and employee, one
//! voucher per payslip, unique voucher numbers) are enforced by [`Tables`].
//!
//! # Example
//!
//! ```
//! use payroll_engine::store::RecordStore;
//! use payroll_engine::models::{Employee, Role};
//!
//! let store = RecordStore::default();
//! let employee = store
//!     .transaction(|tables| {
//!         tables.insert_employee(Employee {
//!             id: 0,
//!             username: "okello".to_string(),
//!             full_name: String::new(),
//!             role: Role::Staff,
//!             is_superuser: false,
//!             groups: vec![],
//!             department_roles: vec![],
//!             profile: None,
//!         })
//!     })
//!     .unwrap();
//! assert_eq!(store.read(|tables| tables.employees().len()).unwrap(), 1);
//! # let _ = employee;
//! ```

mod tables;

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    EmployeePayItem, PayItemType, Payslip, Penalty, RecordId, SalaryStructure, SalaryVoucher,
    VoucherStatus,
};

pub use tables::Tables;

/// The persistence boundary consumed by the payslip calculator.
///
/// Reads return owned records. The two upserts target uniquely keyed rows:
/// a payslip by (run, employee) and a voucher by payslip.
pub trait PayrollRepository {
    /// Returns the salary structure of an employee, active or not.
    fn salary_structure_for(&self, employee_id: RecordId) -> Option<SalaryStructure>;

    /// Returns every pay item of an employee together with its type.
    fn pay_items_for(&self, employee_id: RecordId) -> Vec<(EmployeePayItem, PayItemType)>;

    /// Returns the penalties of an employee applying to `month`.
    fn penalties_for(&self, employee_id: RecordId, month: NaiveDate) -> Vec<Penalty>;

    /// Creates or overwrites the payslip keyed by its run and employee.
    ///
    /// The `id` of `payslip` is ignored; the stored record is returned.
    fn upsert_payslip(&mut self, payslip: Payslip) -> PayrollResult<Payslip>;

    /// Creates or overwrites the voucher number and status of the voucher
    /// belonging to `payslip_id`. Attribution fields of an existing voucher
    /// are left untouched.
    fn upsert_voucher(
        &mut self,
        payslip_id: RecordId,
        voucher_number: &str,
        status: VoucherStatus,
        now: DateTime<Utc>,
    ) -> PayrollResult<SalaryVoucher>;

    /// Saves every field of an existing voucher.
    fn update_voucher(&mut self, voucher: &SalaryVoucher) -> PayrollResult<()>;
}

/// In-memory record store with snapshot transactions.
#[derive(Debug, Default)]
pub struct RecordStore {
    tables: Mutex<Tables>,
}

impl RecordStore {
    /// Creates a store holding `tables`.
    pub fn new(tables: Tables) -> Self {
        Self {
            tables: Mutex::new(tables),
        }
    }

    /// Runs `f` against a working copy of the tables and commits it on `Ok`.
    ///
    /// Transactions are serialized. On `Err` every write made by `f` is
    /// discarded.
    pub fn transaction<T, F>(&self, f: F) -> PayrollResult<T>
    where
        F: FnOnce(&mut Tables) -> PayrollResult<T>,
    {
        let mut guard = self.tables.lock().map_err(|_| PayrollError::StorePoisoned)?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }

    /// Runs a read-only closure against the committed tables.
    pub fn read<T, F>(&self, f: F) -> PayrollResult<T>
    where
        F: FnOnce(&Tables) -> T,
    {
        let guard = self.tables.lock().map_err(|_| PayrollError::StorePoisoned)?;
        Ok(f(&guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, Role};

    fn employee(username: &str) -> Employee {
        Employee {
            id: 0,
            username: username.to_string(),
            full_name: String::new(),
            role: Role::Staff,
            is_superuser: false,
            groups: vec![],
            department_roles: vec![],
            profile: None,
        }
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let store = RecordStore::default();
        store
            .transaction(|tables| tables.insert_employee(employee("a")))
            .unwrap();
        assert_eq!(store.read(|t| t.employees().len()).unwrap(), 1);
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let store = RecordStore::default();
        let result: PayrollResult<()> = store.transaction(|tables| {
            tables.insert_employee(employee("a"))?;
            tables.insert_employee(employee("b"))?;
            Err(PayrollError::invalid("test", "abort"))
        });

        assert!(result.is_err());
        assert!(store.read(|t| t.employees().is_empty()).unwrap());
    }

    #[test]
    fn test_failed_constraint_rolls_back_earlier_writes() {
        let store = RecordStore::default();
        store
            .transaction(|tables| tables.insert_employee(employee("a")))
            .unwrap();

        let result = store.transaction(|tables| {
            tables.insert_employee(employee("b"))?;
            tables.insert_employee(employee("a"))
        });

        assert!(matches!(result, Err(PayrollError::UniqueViolation { .. })));
        assert_eq!(store.read(|t| t.employees().len()).unwrap(), 1);
    }
}
