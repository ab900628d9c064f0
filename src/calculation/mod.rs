//! Calculation logic for the payroll engine.
//!
//! This module contains the pure payroll arithmetic (month bounds, pay item
//! aggregation, penalty summaries, statutory tax and the payslip breakdown),
//! voucher numbering, and [`compute_payslip`], which applies all of it to one
//! employee through a [`PayrollRepository`](crate::store::PayrollRepository).

mod breakdown;
mod month;
mod pay_items;
mod payslip;
mod penalties;
mod tax;
mod voucher;

pub use breakdown::{PayslipBreakdown, calculate_breakdown};
pub use month::{first_of_month, month_bounds, period_code};
pub use pay_items::{PayItemTotals, sum_pay_items};
pub use payslip::compute_payslip;
pub use penalties::{PenaltySummary, summarize_penalties};
pub use tax::{STATUTORY_TAX_RATE, calculate_tax, taxable_base};
pub use voucher::{VOUCHER_PREFIX, employee_identifier, voucher_number};
