//! Salary structures, pay item types and employee pay items.

use tracing::info;

use crate::access::Capability;
use crate::error::PayrollResult;
use crate::models::{Employee, EmployeePayItem, PayItemType, RecordId, SalaryStructure};

use super::PayrollService;
use super::inputs::{EmployeePayItemInput, PayItemTypeInput, SalaryStructureInput};

impl PayrollService {
    fn salary_structure_from(&self, id: RecordId, input: SalaryStructureInput) -> SalaryStructure {
        SalaryStructure {
            id,
            employee_id: input.employee_id,
            basic_salary: input.basic_salary,
            allowances: input.allowances,
            deductions: input.deductions,
            currency: input
                .currency
                .unwrap_or_else(|| self.settings.default_currency.clone()),
            effective_from: input.effective_from,
            is_active: input.is_active,
        }
    }

    /// Lists salary structures ordered by employee username.
    pub fn list_salary_structures(&self, actor: &Employee) -> PayrollResult<Vec<SalaryStructure>> {
        self.authorize(actor, Capability::ViewPayroll)?;
        self.store.read(|tables| -> PayrollResult<Vec<SalaryStructure>> {
            let mut keyed = tables
                .salary_structures()
                .into_iter()
                .map(|s| Ok((tables.employee(s.employee_id)?.username, s)))
                .collect::<PayrollResult<Vec<_>>>()?;
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(keyed.into_iter().map(|(_, s)| s).collect())
        })?
    }

    /// Creates the salary structure of an employee. An employee has at most
    /// one structure.
    pub fn create_salary_structure(
        &self,
        input: SalaryStructureInput,
        actor: &Employee,
    ) -> PayrollResult<SalaryStructure> {
        self.authorize(actor, Capability::ManageCompensation)?;
        input.validate()?;
        let structure = self.salary_structure_from(0, input);
        let structure = self
            .store
            .transaction(|tables| tables.insert_salary_structure(structure))?;
        info!(
            structure_id = structure.id,
            employee_id = structure.employee_id,
            basic_salary = %structure.basic_salary,
            actor = %actor.username,
            "Salary structure created"
        );
        Ok(structure)
    }

    /// Overwrites a salary structure.
    pub fn update_salary_structure(
        &self,
        id: RecordId,
        input: SalaryStructureInput,
        actor: &Employee,
    ) -> PayrollResult<SalaryStructure> {
        self.authorize(actor, Capability::ManageCompensation)?;
        input.validate()?;
        let structure = self.salary_structure_from(id, input);
        self.store.transaction(|tables| {
            tables.salary_structure(id)?;
            tables.update_salary_structure(structure.clone())
        })?;
        info!(structure_id = id, actor = %actor.username, "Salary structure updated");
        Ok(structure)
    }

    /// Lists pay item types ordered by kind, then name.
    pub fn list_pay_item_types(&self, actor: &Employee) -> PayrollResult<Vec<PayItemType>> {
        self.authorize(actor, Capability::ViewPayroll)?;
        let mut types = self.store.read(|tables| tables.pay_item_types())?;
        types.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
        Ok(types)
    }

    /// Creates a pay item type. Codes are unique.
    pub fn create_pay_item_type(
        &self,
        input: PayItemTypeInput,
        actor: &Employee,
    ) -> PayrollResult<PayItemType> {
        self.authorize(actor, Capability::ManageCompensation)?;
        input.validate()?;
        let item_type = self.store.transaction(|tables| {
            tables.insert_pay_item_type(PayItemType {
                id: 0,
                code: input.code,
                name: input.name,
                kind: input.kind,
                taxable: input.taxable,
                is_active: input.is_active,
            })
        })?;
        info!(
            item_type_id = item_type.id,
            code = %item_type.code,
            actor = %actor.username,
            "Pay item type created"
        );
        Ok(item_type)
    }

    /// Overwrites a pay item type.
    pub fn update_pay_item_type(
        &self,
        id: RecordId,
        input: PayItemTypeInput,
        actor: &Employee,
    ) -> PayrollResult<PayItemType> {
        self.authorize(actor, Capability::ManageCompensation)?;
        input.validate()?;
        let item_type = PayItemType {
            id,
            code: input.code,
            name: input.name,
            kind: input.kind,
            taxable: input.taxable,
            is_active: input.is_active,
        };
        self.store
            .transaction(|tables| tables.update_pay_item_type(item_type.clone()))?;
        info!(item_type_id = id, actor = %actor.username, "Pay item type updated");
        Ok(item_type)
    }

    /// Lists employee pay items ordered by username, then item kind and
    /// item name.
    pub fn list_pay_items(&self, actor: &Employee) -> PayrollResult<Vec<EmployeePayItem>> {
        self.authorize(actor, Capability::ViewPayroll)?;
        self.store.read(|tables| -> PayrollResult<Vec<EmployeePayItem>> {
            let mut keyed = tables
                .pay_items()
                .into_iter()
                .map(|item| {
                    let username = tables.employee(item.employee_id)?.username;
                    let item_type = tables.pay_item_type(item.item_type_id)?;
                    Ok(((username, item_type.kind, item_type.name), item))
                })
                .collect::<PayrollResult<Vec<_>>>()?;
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(keyed.into_iter().map(|(_, item)| item).collect())
        })?
    }

    /// Assigns a pay item to an employee.
    pub fn create_pay_item(
        &self,
        input: EmployeePayItemInput,
        actor: &Employee,
    ) -> PayrollResult<EmployeePayItem> {
        self.authorize(actor, Capability::ManageCompensation)?;
        input.validate()?;
        let created_at = self.clock.now();
        let item = self.store.transaction(|tables| {
            tables.insert_pay_item(EmployeePayItem {
                id: 0,
                employee_id: input.employee_id,
                item_type_id: input.item_type_id,
                amount: input.amount,
                start_date: input.start_date,
                end_date: input.end_date,
                is_recurring: input.is_recurring,
                is_active: input.is_active,
                created_by: Some(actor.id),
                created_at,
            })
        })?;
        info!(
            pay_item_id = item.id,
            employee_id = item.employee_id,
            amount = %item.amount,
            actor = %actor.username,
            "Pay item created"
        );
        Ok(item)
    }

    /// Overwrites the editable fields of a pay item. Its creator and
    /// creation time are kept.
    pub fn update_pay_item(
        &self,
        id: RecordId,
        input: EmployeePayItemInput,
        actor: &Employee,
    ) -> PayrollResult<EmployeePayItem> {
        self.authorize(actor, Capability::ManageCompensation)?;
        input.validate()?;
        let item = self.store.transaction(|tables| {
            let existing = tables.pay_item(id)?;
            let item = EmployeePayItem {
                employee_id: input.employee_id,
                item_type_id: input.item_type_id,
                amount: input.amount,
                start_date: input.start_date,
                end_date: input.end_date,
                is_recurring: input.is_recurring,
                is_active: input.is_active,
                ..existing
            };
            tables.update_pay_item(item.clone())?;
            Ok(item)
        })?;
        info!(pay_item_id = id, actor = %actor.username, "Pay item updated");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::error::PayrollError;
    use crate::models::PayItemKind;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn structure_input(employee_id: RecordId) -> SalaryStructureInput {
        SalaryStructureInput {
            employee_id,
            basic_salary: dec("750000"),
            allowances: dec("50000"),
            deductions: Decimal::ZERO,
            currency: None,
            effective_from: NaiveDate::from_ymd_opt(2026, 1, 1),
            is_active: true,
        }
    }

    fn type_input(code: &str, name: &str, kind: PayItemKind) -> PayItemTypeInput {
        PayItemTypeInput {
            code: code.to_string(),
            name: name.to_string(),
            kind,
            taxable: true,
            is_active: true,
        }
    }

    fn item_input(employee_id: RecordId, item_type_id: RecordId) -> EmployeePayItemInput {
        EmployeePayItemInput {
            employee_id,
            item_type_id,
            amount: dec("25000"),
            start_date: None,
            end_date: None,
            is_recurring: true,
            is_active: true,
        }
    }

    #[test]
    fn test_structure_gets_default_currency() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let structure = service.create_salary_structure(structure_input(2), &hr).unwrap();
        assert_eq!(structure.currency, "UGX");
    }

    #[test]
    fn test_second_structure_for_employee_rejected() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        service.create_salary_structure(structure_input(2), &hr).unwrap();
        let result = service.create_salary_structure(structure_input(2), &hr);
        assert!(matches!(result, Err(PayrollError::UniqueViolation { .. })));
    }

    #[test]
    fn test_update_missing_structure_not_found() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let result = service.update_salary_structure(55, structure_input(2), &hr);
        assert!(matches!(result, Err(PayrollError::NotFound { .. })));
    }

    #[test]
    fn test_structures_listed_by_username() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        service.create_salary_structure(structure_input(2), &hr).unwrap();
        service.create_salary_structure(structure_input(3), &hr).unwrap();
        let owners: Vec<_> = service
            .list_salary_structures(&hr)
            .unwrap()
            .iter()
            .map(|s| s.employee_id)
            .collect();
        assert_eq!(owners, vec![3, 2]);
    }

    #[test]
    fn test_compensation_requires_capability() {
        let service = create_test_service();
        let supervisor = service.resolve_actor(4).unwrap();
        let result = service.create_salary_structure(structure_input(2), &supervisor);
        assert!(matches!(result, Err(PayrollError::PermissionDenied { .. })));
        assert!(service.list_pay_items(&supervisor).is_err());
    }

    #[test]
    fn test_pay_item_types_listed_by_kind_then_name() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        service
            .create_pay_item_type(type_input("loan", "Salary advance", PayItemKind::Deduction), &hr)
            .unwrap();
        service
            .create_pay_item_type(type_input("transport", "Transport", PayItemKind::Allowance), &hr)
            .unwrap();
        service
            .create_pay_item_type(type_input("housing", "Housing", PayItemKind::Allowance), &hr)
            .unwrap();

        let codes: Vec<_> = service
            .list_pay_item_types(&hr)
            .unwrap()
            .into_iter()
            .map(|t| t.code)
            .collect();
        assert_eq!(codes, vec!["housing", "transport", "loan"]);
    }

    #[test]
    fn test_duplicate_pay_item_type_code_rejected() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        service
            .create_pay_item_type(type_input("housing", "Housing", PayItemKind::Allowance), &hr)
            .unwrap();
        let result = service
            .create_pay_item_type(type_input("housing", "Housing 2", PayItemKind::Allowance), &hr);
        assert!(matches!(result, Err(PayrollError::UniqueViolation { .. })));
    }

    #[test]
    fn test_pay_item_records_creator_and_keeps_it_on_update() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let housing = service
            .create_pay_item_type(type_input("housing", "Housing", PayItemKind::Allowance), &hr)
            .unwrap();
        let item = service.create_pay_item(item_input(2, housing.id), &hr).unwrap();
        assert_eq!(item.created_by, Some(1));
        assert_eq!(item.created_at, now());

        let mut input = item_input(2, housing.id);
        input.amount = dec("30000");
        let updated = service.update_pay_item(item.id, input, &hr).unwrap();
        assert_eq!(updated.amount, dec("30000"));
        assert_eq!(updated.created_by, Some(1));
        assert_eq!(updated.id, item.id);
    }

    #[test]
    fn test_pay_items_listed_by_username_kind_name() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let loan = service
            .create_pay_item_type(type_input("loan", "Loan", PayItemKind::Deduction), &hr)
            .unwrap();
        let housing = service
            .create_pay_item_type(type_input("housing", "Housing", PayItemKind::Allowance), &hr)
            .unwrap();
        let a = service.create_pay_item(item_input(2, loan.id), &hr).unwrap();
        let b = service.create_pay_item(item_input(2, housing.id), &hr).unwrap();
        let c = service.create_pay_item(item_input(3, loan.id), &hr).unwrap();

        let ids: Vec<_> = service
            .list_pay_items(&hr)
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn test_pay_item_for_unknown_type_rejected() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let result = service.create_pay_item(item_input(2, 999), &hr);
        assert!(matches!(result, Err(PayrollError::NotFound { entity: "PayItemType", .. })));
    }
}
