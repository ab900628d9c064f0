//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints for payroll runs, voucher
//! clearance, the bank export, and compensation and penalty records.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ACTOR_HEADER, create_router};
pub use request::{
    ClearVoucherRequest, CreatePayrollRunRequest, EmployeePayItemRequest, PayItemTypeRequest,
    PenaltyRequest, SalaryStructureRequest,
};
pub use response::{ApiError, VoucherExportResponse};
pub use state::AppState;
