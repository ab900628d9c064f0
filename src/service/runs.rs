//! Payroll runs, voucher clearance and the bank export.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::access::Capability;
use crate::calculation::{compute_payslip, first_of_month};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Employee, PayrollRun, PayrollRunDetail, PayslipEntry, RecordId, SalaryVoucher,
    VoucherExport, VoucherExportRow, VoucherStatus,
};
use crate::store::{PayrollRepository, Tables};

use super::PayrollService;

fn run_detail(tables: &Tables, run: PayrollRun) -> PayrollResult<PayrollRunDetail> {
    let mut payslips = tables
        .payslips_for_run(run.id)
        .into_iter()
        .map(|payslip| {
            let employee = tables.employee(payslip.employee_id)?;
            Ok(PayslipEntry {
                username: employee.username.clone(),
                employee_name: employee.display_name().to_string(),
                voucher: tables.voucher_for_payslip(payslip.id),
                payslip,
            })
        })
        .collect::<PayrollResult<Vec<_>>>()?;
    payslips.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(PayrollRunDetail { run, payslips })
}

impl PayrollService {
    /// Creates the payroll run for the month containing `month` and computes
    /// a payslip for every employee with an active salary structure.
    ///
    /// Everything happens in one transaction: if any payslip fails, no run
    /// and no payslip is stored. A second run for the same month fails with
    /// [`PayrollError::UniqueViolation`].
    pub fn create_payroll_run(
        &self,
        month: NaiveDate,
        actor: &Employee,
    ) -> PayrollResult<PayrollRunDetail> {
        self.authorize(actor, Capability::ManagePayroll)?;
        let month = first_of_month(month);
        let clock = self.clock.as_ref();

        let result = self.store.transaction(|tables| {
            let run = tables.insert_payroll_run(PayrollRun {
                id: 0,
                month,
                created_by: Some(actor.id),
                created_at: clock.now(),
                locked: false,
            })?;
            for structure in tables.active_salary_structures() {
                let employee = tables.employee(structure.employee_id)?;
                compute_payslip(tables, &run, &employee, Some(actor.id), clock)?;
            }
            run_detail(tables, run)
        });

        match &result {
            Ok(detail) => info!(
                run_id = detail.run.id,
                month = %detail.run.period_label(),
                payslips = detail.payslips.len(),
                actor = %actor.username,
                "Payroll run created"
            ),
            Err(err) => warn!(month = %month, error = %err, "Payroll run creation failed"),
        }
        result
    }

    /// Lists payroll runs, newest month first.
    pub fn list_payroll_runs(&self, actor: &Employee) -> PayrollResult<Vec<PayrollRun>> {
        self.authorize(actor, Capability::ViewPayroll)?;
        let mut runs = self.store.read(Tables::payroll_runs)?;
        runs.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(runs)
    }

    /// Returns a run with its payslips and vouchers, ordered by username.
    pub fn payroll_run_detail(
        &self,
        run_id: RecordId,
        actor: &Employee,
    ) -> PayrollResult<PayrollRunDetail> {
        self.authorize(actor, Capability::ViewPayroll)?;
        self.store.read(|tables| -> PayrollResult<PayrollRunDetail> {
            run_detail(tables, tables.payroll_run(run_id)?)
        })?
    }

    /// Locks a run so that its vouchers can no longer be cleared.
    ///
    /// Locking an already locked run is a no-op.
    pub fn lock_payroll_run(&self, run_id: RecordId, actor: &Employee) -> PayrollResult<PayrollRun> {
        self.authorize(actor, Capability::ManagePayroll)?;
        let run = self.store.transaction(|tables| {
            let mut run = tables.payroll_run(run_id)?;
            if !run.locked {
                run.locked = true;
                tables.update_payroll_run(run.clone())?;
            }
            Ok(run)
        })?;
        info!(run_id, month = %run.period_label(), actor = %actor.username, "Payroll run locked");
        Ok(run)
    }

    /// Recomputes the payslip and releases its voucher.
    ///
    /// Fails with [`PayrollError::RunLocked`] when the run is locked and with
    /// [`PayrollError::PendingPenalties`] while the employee has a pending
    /// penalty for the run's month. Otherwise the payslip is recomputed and
    /// the voucher is forced to `CLEARED`, attributed to `actor`, in one
    /// transaction. `notes`, when given, replace the clearance notes.
    pub fn clear_voucher(
        &self,
        payslip_id: RecordId,
        notes: Option<String>,
        actor: &Employee,
    ) -> PayrollResult<SalaryVoucher> {
        self.authorize(actor, Capability::ClearVouchers)?;
        let clock = self.clock.as_ref();

        let result = self.store.transaction(|tables| {
            let payslip = tables.payslip(payslip_id)?;
            let run = tables.payroll_run(payslip.payroll_run_id)?;
            let employee = tables.employee(payslip.employee_id)?;

            if run.locked {
                return Err(PayrollError::RunLocked { month: run.month });
            }
            if tables.has_pending_penalty(employee.id, run.month) {
                return Err(PayrollError::PendingPenalties {
                    employee: employee.username.clone(),
                    month: run.month,
                });
            }

            compute_payslip(tables, &run, &employee, Some(actor.id), clock)?;

            let mut voucher = tables
                .voucher_for_payslip(payslip.id)
                .ok_or_else(|| PayrollError::not_found("SalaryVoucher", payslip.id))?;
            voucher.status = VoucherStatus::Cleared;
            voucher.cleared_by = Some(actor.id);
            voucher.cleared_at = Some(clock.now());
            if let Some(notes) = notes {
                voucher.clearance_notes = notes;
            }
            tables.update_voucher(&voucher)?;
            Ok(voucher)
        });

        match &result {
            Ok(voucher) => info!(
                payslip_id,
                voucher_number = %voucher.voucher_number,
                actor = %actor.username,
                "Salary voucher cleared"
            ),
            Err(err) => warn!(payslip_id, error = %err, "Salary voucher clearance rejected"),
        }
        result
    }

    /// Returns the bank export rows of a run's cleared vouchers, ordered by
    /// username, together with the run they were read with.
    pub fn cleared_voucher_export(
        &self,
        run_id: RecordId,
        actor: &Employee,
    ) -> PayrollResult<VoucherExport> {
        self.authorize(actor, Capability::ExportPayroll)?;
        let export = self.store.read(|tables| -> PayrollResult<VoucherExport> {
            let detail = run_detail(tables, tables.payroll_run(run_id)?)?;
            let rows = detail
                .payslips
                .into_iter()
                .filter_map(|entry| {
                    let voucher = entry.voucher.filter(SalaryVoucher::is_cleared)?;
                    Some((entry.payslip, entry.employee_name, voucher))
                })
                .map(|(payslip, employee_name, voucher)| {
                    let profile = tables
                        .employee(payslip.employee_id)?
                        .profile
                        .unwrap_or_default();
                    Ok(VoucherExportRow {
                        employee_name,
                        employee_id: profile.employee_id,
                        bank_name: profile.bank_name,
                        account_number: profile.bank_account_number,
                        branch: profile.bank_branch,
                        net_pay: payslip.net_pay,
                        voucher_number: voucher.voucher_number,
                    })
                })
                .collect::<PayrollResult<Vec<_>>>()?;
            Ok(VoucherExport {
                run: detail.run,
                rows,
            })
        })??;

        info!(
            run_id,
            month = %export.run.period_label(),
            rows = export.rows.len(),
            actor = %actor.username,
            "Cleared vouchers exported"
        );
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{PenaltyInput, SalaryStructureInput};
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{AccessPolicy, ConfigLoader, PayrollSettings};
    use crate::models::{PenaltyStatus, Role};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn march() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn add_structure(service: &PayrollService, hr: &Employee, employee_id: RecordId) {
        service
            .create_salary_structure(
                SalaryStructureInput {
                    employee_id,
                    basic_salary: dec("1000000"),
                    allowances: Decimal::ZERO,
                    deductions: Decimal::ZERO,
                    currency: None,
                    effective_from: None,
                    is_active: true,
                },
                hr,
            )
            .unwrap();
    }

    fn add_penalty(service: &PayrollService, hr: &Employee, status: PenaltyStatus) -> RecordId {
        service
            .create_penalty(
                PenaltyInput {
                    employee_id: 2,
                    department: None,
                    incident_date: None,
                    applies_to_month: NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
                    amount: dec("50000"),
                    reason: "Late reporting".to_string(),
                    status,
                    clearance_notes: String::new(),
                },
                hr,
            )
            .unwrap()
            .id
    }

    #[test]
    fn test_create_run_normalizes_month_and_computes() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        add_structure(&service, &hr, 2);
        add_structure(&service, &hr, 3);

        let detail = service
            .create_payroll_run(NaiveDate::from_ymd_opt(2026, 3, 17).unwrap(), &hr)
            .unwrap();

        assert_eq!(detail.run.month, march());
        assert_eq!(detail.run.created_by, Some(1));
        let usernames: Vec<_> = detail.payslips.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(usernames, vec!["akello", "okello"]);
        for entry in &detail.payslips {
            assert_eq!(entry.payslip.net_pay, dec("900000"));
            let voucher = entry.voucher.as_ref().unwrap();
            assert_eq!(voucher.status, VoucherStatus::Cleared);
        }
    }

    #[test]
    fn test_duplicate_month_rejected() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        service.create_payroll_run(march(), &hr).unwrap();

        let result = service.create_payroll_run(NaiveDate::from_ymd_opt(2026, 3, 30).unwrap(), &hr);
        assert!(matches!(result, Err(PayrollError::UniqueViolation { .. })));
        assert_eq!(service.list_payroll_runs(&hr).unwrap().len(), 1);
    }

    #[test]
    fn test_staff_cannot_create_run() {
        let service = create_test_service();
        let staff = service.resolve_actor(2).unwrap();
        let result = service.create_payroll_run(march(), &staff);
        assert!(matches!(result, Err(PayrollError::PermissionDenied { .. })));
    }

    #[test]
    fn test_runs_listed_newest_first() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        for month in [3, 1, 2] {
            service
                .create_payroll_run(NaiveDate::from_ymd_opt(2026, month, 1).unwrap(), &hr)
                .unwrap();
        }
        let months: Vec<_> = service
            .list_payroll_runs(&hr)
            .unwrap()
            .iter()
            .map(PayrollRun::period_label)
            .collect();
        assert_eq!(months, vec!["2026-03", "2026-02", "2026-01"]);
    }

    #[test]
    fn test_pending_penalty_blocks_clearance_until_cleared() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        add_structure(&service, &hr, 2);
        let penalty_id = add_penalty(&service, &hr, PenaltyStatus::Pending);

        let detail = service.create_payroll_run(march(), &hr).unwrap();
        let entry = &detail.payslips[0];
        assert!(entry.payslip.is_held);
        assert_eq!(entry.voucher.as_ref().unwrap().status, VoucherStatus::OnHold);

        let result = service.clear_voucher(entry.payslip.id, None, &hr);
        assert!(matches!(result, Err(PayrollError::PendingPenalties { .. })));

        let penalty = service.store().read(|t| t.penalty(penalty_id)).unwrap().unwrap();
        service
            .update_penalty(
                penalty_id,
                PenaltyInput {
                    employee_id: penalty.employee_id,
                    department: penalty.department,
                    incident_date: Some(penalty.incident_date),
                    applies_to_month: penalty.applies_to_month,
                    amount: penalty.amount,
                    reason: penalty.reason,
                    status: PenaltyStatus::Cleared,
                    clearance_notes: "Confirmed by supervisor".to_string(),
                },
                &hr,
            )
            .unwrap();

        let voucher = service
            .clear_voucher(entry.payslip.id, Some("Released".to_string()), &hr)
            .unwrap();
        assert_eq!(voucher.status, VoucherStatus::Cleared);
        assert_eq!(voucher.cleared_by, Some(1));
        assert_eq!(voucher.cleared_at, Some(now()));
        assert_eq!(voucher.clearance_notes, "Released");

        let detail = service.payroll_run_detail(detail.run.id, &hr).unwrap();
        let payslip = &detail.payslips[0].payslip;
        assert_eq!(payslip.penalty_total, dec("50000"));
        assert_eq!(payslip.tax_amount, dec("95000"));
        assert_eq!(payslip.net_pay, dec("855000"));
        assert!(!payslip.is_held);
    }

    #[test]
    fn test_locked_run_rejects_clearance() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        add_structure(&service, &hr, 2);
        let detail = service.create_payroll_run(march(), &hr).unwrap();

        let locked = service.lock_payroll_run(detail.run.id, &hr).unwrap();
        assert!(locked.locked);
        assert!(service.lock_payroll_run(detail.run.id, &hr).unwrap().locked);

        let result = service.clear_voucher(detail.payslips[0].payslip.id, None, &hr);
        match result {
            Err(PayrollError::RunLocked { month }) => assert_eq!(month, march()),
            other => panic!("Expected RunLocked, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_payslip_not_found() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let result = service.clear_voucher(404, None, &hr);
        assert!(matches!(result, Err(PayrollError::NotFound { entity: "Payslip", .. })));
    }

    #[test]
    fn test_export_lists_only_cleared_vouchers() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        add_structure(&service, &hr, 2);
        add_structure(&service, &hr, 3);
        add_penalty(&service, &hr, PenaltyStatus::Pending);

        let detail = service.create_payroll_run(march(), &hr).unwrap();
        let export = service.cleared_voucher_export(detail.run.id, &hr).unwrap();

        assert_eq!(export.run, detail.run);
        assert_eq!(export.rows.len(), 1);
        let row = &export.rows[0];
        assert_eq!(row.employee_name, "akello");
        assert_eq!(row.employee_id, "EMP-003");
        assert_eq!(row.bank_name, "Stanbic Bank");
        assert_eq!(row.account_number, "9030000003");
        assert_eq!(row.branch, "Kampala Road");
        assert_eq!(row.net_pay, dec("900000"));
        assert_eq!(row.voucher_number, "SV-202603-EMP-003");
    }

    #[test]
    fn test_export_of_unknown_run_not_found() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();
        let result = service.cleared_voucher_export(77, &hr);
        assert!(matches!(result, Err(PayrollError::NotFound { entity: "PayrollRun", .. })));
    }

    #[test]
    fn test_failed_run_stores_nothing() {
        // "x" as a username and "x" as an HR id both number as SV-202603-x
        let mut no_profile = create_test_employee(2, "x", Role::Staff);
        no_profile.profile = None;
        let mut clashing = create_test_employee(3, "okello", Role::Staff);
        if let Some(profile) = clashing.profile.as_mut() {
            profile.employee_id = "x".to_string();
        }
        let config = ConfigLoader::from_parts(
            PayrollSettings::default(),
            AccessPolicy::default(),
            vec![create_test_employee(1, "hr", Role::HrManager), no_profile, clashing],
        );
        let service =
            PayrollService::from_config(&config, Arc::new(FixedClock::new(now()))).unwrap();
        let hr = service.resolve_actor(1).unwrap();
        add_structure(&service, &hr, 2);
        add_structure(&service, &hr, 3);

        match service.create_payroll_run(march(), &hr) {
            Err(PayrollError::UniqueViolation { entity, key }) => {
                assert_eq!(entity, "SalaryVoucher");
                assert_eq!(key, "voucher_number=SV-202603-x");
            }
            other => panic!("Expected UniqueViolation, got {:?}", other),
        }

        assert!(service.list_payroll_runs(&hr).unwrap().is_empty());
        let (payslips, vouchers) = service
            .store()
            .read(|tables| (tables.payslip_count(), tables.voucher_count()))
            .unwrap();
        assert_eq!(payslips, 0);
        assert_eq!(vouchers, 0);
    }

    #[test]
    fn test_oversized_salary_rejected_and_store_stays_usable() {
        let service = create_test_service();
        let hr = service.resolve_actor(1).unwrap();

        let result = service.create_salary_structure(
            SalaryStructureInput {
                employee_id: 2,
                basic_salary: Decimal::MAX.trunc(),
                allowances: dec("1"),
                deductions: Decimal::ZERO,
                currency: None,
                effective_from: None,
                is_active: true,
            },
            &hr,
        );
        assert!(matches!(result, Err(PayrollError::InvalidInput { .. })));

        let detail = service.create_payroll_run(march(), &hr).unwrap();
        assert!(detail.payslips.is_empty());
        assert_eq!(service.list_payroll_runs(&hr).unwrap().len(), 1);
    }
}
