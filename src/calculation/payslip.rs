//! The payslip calculator.
//!
//! Reads an employee's salary structure, pay items and penalties through a
//! [`PayrollRepository`], computes the payslip figures for a run's month and
//! upserts the payslip and its salary voucher.

use tracing::debug;

use crate::clock::Clock;
use crate::error::PayrollResult;
use crate::models::{Employee, PayrollRun, Payslip, RecordId, VoucherStatus};
use crate::store::PayrollRepository;

use super::breakdown::calculate_breakdown;
use super::month::month_bounds;
use super::pay_items::sum_pay_items;
use super::penalties::summarize_penalties;
use super::voucher::voucher_number;

/// Computes and stores the payslip of `employee` for `run`.
///
/// Returns `Ok(None)` without writing anything when the employee has no
/// salary structure or the structure is inactive. Otherwise the payslip keyed
/// by (run, employee) and its voucher are created or overwritten, so calling
/// this twice with unchanged data produces identical records.
///
/// The voucher is `ON_HOLD` while any penalty for the month is pending and
/// `CLEARED` otherwise. A voucher that becomes cleared is attributed to
/// `actor` at the clock's current time unless it already carries a clearance
/// time; a held voucher loses any stale attribution.
///
/// The run's `locked` flag is not consulted here.
pub fn compute_payslip<R>(
    repo: &mut R,
    run: &PayrollRun,
    employee: &Employee,
    actor: Option<RecordId>,
    clock: &dyn Clock,
) -> PayrollResult<Option<Payslip>>
where
    R: PayrollRepository + ?Sized,
{
    let structure = match repo.salary_structure_for(employee.id) {
        Some(structure) if structure.is_active => structure,
        _ => {
            debug!(
                run_id = run.id,
                employee_id = employee.id,
                "Skipping employee without an active salary structure"
            );
            return Ok(None);
        }
    };

    let (month_start, month_end) = month_bounds(run.month)?;

    let items = repo.pay_items_for(employee.id);
    let item_totals = sum_pay_items(
        items.iter().map(|(item, item_type)| (item, item_type)),
        month_start,
        month_end,
    );

    let penalties = repo.penalties_for(employee.id, run.month);
    let penalty_summary = summarize_penalties(&penalties, employee.id, run.month);

    let breakdown = calculate_breakdown(&structure, &item_totals, &penalty_summary)?;

    let payslip = repo.upsert_payslip(Payslip {
        id: 0,
        payroll_run_id: run.id,
        employee_id: employee.id,
        basic_salary: breakdown.basic_salary,
        allowance_total: breakdown.allowance_total,
        deduction_total: breakdown.deduction_total,
        penalty_total: breakdown.penalty_total,
        gross_pay: breakdown.gross_pay,
        tax_amount: breakdown.tax_amount,
        net_pay: breakdown.net_pay,
        is_held: breakdown.is_held,
    })?;

    let status = if payslip.is_held {
        VoucherStatus::OnHold
    } else {
        VoucherStatus::Cleared
    };
    let now = clock.now();
    let mut voucher = repo.upsert_voucher(
        payslip.id,
        &voucher_number(run.month, employee),
        status,
        now,
    )?;

    match voucher.status {
        VoucherStatus::Cleared if voucher.cleared_at.is_none() => {
            voucher.cleared_by = actor;
            voucher.cleared_at = Some(now);
            repo.update_voucher(&voucher)?;
        }
        VoucherStatus::OnHold if voucher.cleared_by.is_some() || voucher.cleared_at.is_some() => {
            voucher.cleared_by = None;
            voucher.cleared_at = None;
            repo.update_voucher(&voucher)?;
        }
        _ => {}
    }

    debug!(
        run_id = run.id,
        employee_id = employee.id,
        payslip_id = payslip.id,
        voucher_number = %voucher.voucher_number,
        items_applied = item_totals.items_applied,
        gross_pay = %payslip.gross_pay,
        net_pay = %payslip.net_pay,
        is_held = payslip.is_held,
        "Payslip computed"
    );

    Ok(Some(payslip))
}
