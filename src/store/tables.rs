//! Table storage and unique constraints.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Employee, EmployeePayItem, PayItemType, PayrollRun, Payslip, Penalty, PenaltyStatus, RecordId,
    SalaryStructure, SalaryVoucher, VoucherStatus,
};

use super::PayrollRepository;

/// Every payroll table plus the indexes backing its unique constraints.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    last_id: RecordId,
    employees: BTreeMap<RecordId, Employee>,
    salary_structures: BTreeMap<RecordId, SalaryStructure>,
    pay_item_types: BTreeMap<RecordId, PayItemType>,
    pay_items: BTreeMap<RecordId, EmployeePayItem>,
    penalties: BTreeMap<RecordId, Penalty>,
    payroll_runs: BTreeMap<RecordId, PayrollRun>,
    payslips: BTreeMap<RecordId, Payslip>,
    vouchers: BTreeMap<RecordId, SalaryVoucher>,
    run_by_month: HashMap<NaiveDate, RecordId>,
    payslip_by_key: HashMap<(RecordId, RecordId), RecordId>,
    voucher_by_payslip: HashMap<RecordId, RecordId>,
    voucher_by_number: HashMap<String, RecordId>,
}

fn unique_violation(entity: &'static str, key: String) -> PayrollError {
    PayrollError::UniqueViolation { entity, key }
}

impl Tables {
    fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }

    // Employees

    /// Inserts an employee.
    ///
    /// A non-zero `id` is kept as the primary key, which lets directory
    /// fixtures carry stable identifiers; otherwise a fresh id is assigned.
    /// Usernames and HR employee IDs are unique.
    pub fn insert_employee(&mut self, mut employee: Employee) -> PayrollResult<Employee> {
        if self.employees.values().any(|e| e.username == employee.username) {
            return Err(unique_violation(
                "Employee",
                format!("username={}", employee.username),
            ));
        }
        if let Some(hr_id) = employee.hr_employee_id() {
            if self
                .employees
                .values()
                .any(|e| e.hr_employee_id() == Some(hr_id))
            {
                return Err(unique_violation("Employee", format!("employee_id={}", hr_id)));
            }
        }
        if employee.id == 0 {
            employee.id = self.next_id();
        } else if self.employees.contains_key(&employee.id) {
            return Err(unique_violation("Employee", format!("id={}", employee.id)));
        } else {
            self.last_id = self.last_id.max(employee.id);
        }
        self.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    /// Looks up an employee by id.
    pub fn employee(&self, id: RecordId) -> PayrollResult<Employee> {
        self.employees
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("Employee", id))
    }

    /// Returns all employees ordered by id.
    pub fn employees(&self) -> Vec<Employee> {
        self.employees.values().cloned().collect()
    }

    // Salary structures

    /// Inserts a salary structure; at most one exists per employee.
    pub fn insert_salary_structure(
        &mut self,
        mut structure: SalaryStructure,
    ) -> PayrollResult<SalaryStructure> {
        self.employee(structure.employee_id)?;
        self.check_structure_unique(&structure)?;
        structure.id = self.next_id();
        self.salary_structures.insert(structure.id, structure.clone());
        Ok(structure)
    }

    /// Overwrites an existing salary structure.
    pub fn update_salary_structure(&mut self, structure: SalaryStructure) -> PayrollResult<()> {
        if !self.salary_structures.contains_key(&structure.id) {
            return Err(PayrollError::not_found("SalaryStructure", structure.id));
        }
        self.employee(structure.employee_id)?;
        self.check_structure_unique(&structure)?;
        self.salary_structures.insert(structure.id, structure);
        Ok(())
    }

    fn check_structure_unique(&self, structure: &SalaryStructure) -> PayrollResult<()> {
        let taken = self
            .salary_structures
            .values()
            .any(|s| s.employee_id == structure.employee_id && s.id != structure.id);
        if taken {
            return Err(unique_violation(
                "SalaryStructure",
                format!("employee={}", structure.employee_id),
            ));
        }
        Ok(())
    }

    /// Looks up a salary structure by id.
    pub fn salary_structure(&self, id: RecordId) -> PayrollResult<SalaryStructure> {
        self.salary_structures
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("SalaryStructure", id))
    }

    /// Returns all salary structures ordered by id.
    pub fn salary_structures(&self) -> Vec<SalaryStructure> {
        self.salary_structures.values().cloned().collect()
    }

    /// Returns the structures of payroll-eligible employees.
    pub fn active_salary_structures(&self) -> Vec<SalaryStructure> {
        self.salary_structures
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect()
    }

    // Pay item types

    /// Inserts a pay item type; codes are unique.
    pub fn insert_pay_item_type(&mut self, mut item_type: PayItemType) -> PayrollResult<PayItemType> {
        self.check_code_unique(&item_type)?;
        item_type.id = self.next_id();
        self.pay_item_types.insert(item_type.id, item_type.clone());
        Ok(item_type)
    }

    /// Overwrites an existing pay item type.
    pub fn update_pay_item_type(&mut self, item_type: PayItemType) -> PayrollResult<()> {
        if !self.pay_item_types.contains_key(&item_type.id) {
            return Err(PayrollError::not_found("PayItemType", item_type.id));
        }
        self.check_code_unique(&item_type)?;
        self.pay_item_types.insert(item_type.id, item_type);
        Ok(())
    }

    fn check_code_unique(&self, item_type: &PayItemType) -> PayrollResult<()> {
        let taken = self
            .pay_item_types
            .values()
            .any(|t| t.code == item_type.code && t.id != item_type.id);
        if taken {
            return Err(unique_violation(
                "PayItemType",
                format!("code={}", item_type.code),
            ));
        }
        Ok(())
    }

    /// Looks up a pay item type by id.
    pub fn pay_item_type(&self, id: RecordId) -> PayrollResult<PayItemType> {
        self.pay_item_types
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("PayItemType", id))
    }

    /// Returns all pay item types ordered by id.
    pub fn pay_item_types(&self) -> Vec<PayItemType> {
        self.pay_item_types.values().cloned().collect()
    }

    // Employee pay items

    /// Inserts a pay item for an existing employee and type.
    pub fn insert_pay_item(&mut self, mut item: EmployeePayItem) -> PayrollResult<EmployeePayItem> {
        self.employee(item.employee_id)?;
        self.pay_item_type(item.item_type_id)?;
        item.id = self.next_id();
        self.pay_items.insert(item.id, item.clone());
        Ok(item)
    }

    /// Overwrites an existing pay item.
    pub fn update_pay_item(&mut self, item: EmployeePayItem) -> PayrollResult<()> {
        if !self.pay_items.contains_key(&item.id) {
            return Err(PayrollError::not_found("EmployeePayItem", item.id));
        }
        self.employee(item.employee_id)?;
        self.pay_item_type(item.item_type_id)?;
        self.pay_items.insert(item.id, item);
        Ok(())
    }

    /// Looks up a pay item by id.
    pub fn pay_item(&self, id: RecordId) -> PayrollResult<EmployeePayItem> {
        self.pay_items
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("EmployeePayItem", id))
    }

    /// Returns all pay items ordered by id.
    pub fn pay_items(&self) -> Vec<EmployeePayItem> {
        self.pay_items.values().cloned().collect()
    }

    // Penalties

    /// Inserts a penalty for an existing employee.
    pub fn insert_penalty(&mut self, mut penalty: Penalty) -> PayrollResult<Penalty> {
        self.employee(penalty.employee_id)?;
        penalty.id = self.next_id();
        self.penalties.insert(penalty.id, penalty.clone());
        Ok(penalty)
    }

    /// Overwrites an existing penalty.
    pub fn update_penalty(&mut self, penalty: Penalty) -> PayrollResult<()> {
        if !self.penalties.contains_key(&penalty.id) {
            return Err(PayrollError::not_found("Penalty", penalty.id));
        }
        self.employee(penalty.employee_id)?;
        self.penalties.insert(penalty.id, penalty);
        Ok(())
    }

    /// Looks up a penalty by id.
    pub fn penalty(&self, id: RecordId) -> PayrollResult<Penalty> {
        self.penalties
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("Penalty", id))
    }

    /// Returns all penalties ordered by id.
    pub fn penalties(&self) -> Vec<Penalty> {
        self.penalties.values().cloned().collect()
    }

    /// Returns true if any pending penalty applies to the employee and month.
    pub fn has_pending_penalty(&self, employee_id: RecordId, month: NaiveDate) -> bool {
        self.penalties
            .values()
            .any(|p| p.applies_to(employee_id, month) && p.status == PenaltyStatus::Pending)
    }

    // Payroll runs

    /// Inserts a payroll run; at most one run exists per month.
    pub fn insert_payroll_run(&mut self, mut run: PayrollRun) -> PayrollResult<PayrollRun> {
        if self.run_by_month.contains_key(&run.month) {
            return Err(unique_violation("PayrollRun", format!("month={}", run.month)));
        }
        run.id = self.next_id();
        self.run_by_month.insert(run.month, run.id);
        self.payroll_runs.insert(run.id, run.clone());
        Ok(run)
    }

    /// Overwrites an existing payroll run. The month cannot change.
    pub fn update_payroll_run(&mut self, run: PayrollRun) -> PayrollResult<()> {
        let existing = self
            .payroll_runs
            .get(&run.id)
            .ok_or_else(|| PayrollError::not_found("PayrollRun", run.id))?;
        if existing.month != run.month {
            return Err(PayrollError::invalid("month", "cannot change the month of a payroll run"));
        }
        self.payroll_runs.insert(run.id, run);
        Ok(())
    }

    /// Looks up a payroll run by id.
    pub fn payroll_run(&self, id: RecordId) -> PayrollResult<PayrollRun> {
        self.payroll_runs
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("PayrollRun", id))
    }

    /// Returns all payroll runs ordered by id.
    pub fn payroll_runs(&self) -> Vec<PayrollRun> {
        self.payroll_runs.values().cloned().collect()
    }

    // Payslips and vouchers

    /// Looks up a payslip by id.
    pub fn payslip(&self, id: RecordId) -> PayrollResult<Payslip> {
        self.payslips
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found("Payslip", id))
    }

    /// Looks up the payslip of an employee within a run.
    pub fn payslip_for(&self, run_id: RecordId, employee_id: RecordId) -> Option<Payslip> {
        self.payslip_by_key
            .get(&(run_id, employee_id))
            .and_then(|id| self.payslips.get(id))
            .cloned()
    }

    /// Returns every payslip of a run.
    pub fn payslips_for_run(&self, run_id: RecordId) -> Vec<Payslip> {
        self.payslips
            .values()
            .filter(|p| p.payroll_run_id == run_id)
            .cloned()
            .collect()
    }

    /// Looks up the voucher of a payslip.
    pub fn voucher_for_payslip(&self, payslip_id: RecordId) -> Option<SalaryVoucher> {
        self.voucher_by_payslip
            .get(&payslip_id)
            .and_then(|id| self.vouchers.get(id))
            .cloned()
    }

    /// Returns the total number of payslips.
    pub fn payslip_count(&self) -> usize {
        self.payslips.len()
    }

    /// Returns the total number of vouchers.
    pub fn voucher_count(&self) -> usize {
        self.vouchers.len()
    }

    fn claim_voucher_number(&mut self, voucher_id: RecordId, number: &str) -> PayrollResult<()> {
        match self.voucher_by_number.get(number) {
            Some(owner) if *owner != voucher_id => Err(unique_violation(
                "SalaryVoucher",
                format!("voucher_number={}", number),
            )),
            _ => {
                self.voucher_by_number.insert(number.to_string(), voucher_id);
                Ok(())
            }
        }
    }
}

impl PayrollRepository for Tables {
    fn salary_structure_for(&self, employee_id: RecordId) -> Option<SalaryStructure> {
        self.salary_structures
            .values()
            .find(|s| s.employee_id == employee_id)
            .cloned()
    }

    fn pay_items_for(&self, employee_id: RecordId) -> Vec<(EmployeePayItem, PayItemType)> {
        self.pay_items
            .values()
            .filter(|item| item.employee_id == employee_id)
            .filter_map(|item| {
                self.pay_item_types
                    .get(&item.item_type_id)
                    .map(|item_type| (item.clone(), item_type.clone()))
            })
            .collect()
    }

    fn penalties_for(&self, employee_id: RecordId, month: NaiveDate) -> Vec<Penalty> {
        self.penalties
            .values()
            .filter(|p| p.applies_to(employee_id, month))
            .cloned()
            .collect()
    }

    fn upsert_payslip(&mut self, mut payslip: Payslip) -> PayrollResult<Payslip> {
        self.payroll_run(payslip.payroll_run_id)?;
        self.employee(payslip.employee_id)?;

        let key = (payslip.payroll_run_id, payslip.employee_id);
        payslip.id = match self.payslip_by_key.get(&key).copied() {
            Some(id) => id,
            None => {
                let id = self.next_id();
                self.payslip_by_key.insert(key, id);
                id
            }
        };
        self.payslips.insert(payslip.id, payslip.clone());
        Ok(payslip)
    }

    fn upsert_voucher(
        &mut self,
        payslip_id: RecordId,
        voucher_number: &str,
        status: VoucherStatus,
        now: DateTime<Utc>,
    ) -> PayrollResult<SalaryVoucher> {
        self.payslip(payslip_id)?;

        let mut voucher = match self.voucher_for_payslip(payslip_id) {
            Some(existing) => existing,
            None => SalaryVoucher {
                id: self.next_id(),
                payslip_id,
                voucher_number: String::new(),
                status,
                cleared_by: None,
                cleared_at: None,
                clearance_notes: String::new(),
                created_at: now,
            },
        };

        self.claim_voucher_number(voucher.id, voucher_number)?;
        if !voucher.voucher_number.is_empty() && voucher.voucher_number != voucher_number {
            self.voucher_by_number.remove(&voucher.voucher_number);
        }

        voucher.voucher_number = voucher_number.to_string();
        voucher.status = status;
        self.voucher_by_payslip.insert(payslip_id, voucher.id);
        self.vouchers.insert(voucher.id, voucher.clone());
        Ok(voucher)
    }

    fn update_voucher(&mut self, voucher: &SalaryVoucher) -> PayrollResult<()> {
        let existing = self
            .vouchers
            .get(&voucher.id)
            .ok_or_else(|| PayrollError::not_found("SalaryVoucher", voucher.id))?;
        if existing.payslip_id != voucher.payslip_id {
            return Err(PayrollError::invalid("payslip_id", "cannot move a voucher to another payslip"));
        }
        let previous_number = existing.voucher_number.clone();
        self.claim_voucher_number(voucher.id, &voucher.voucher_number)?;
        if previous_number != voucher.voucher_number {
            self.voucher_by_number.remove(&previous_number);
        }
        self.vouchers.insert(voucher.id, voucher.clone());
        Ok(())
    }
}
