//! HTTP request handlers for the payroll API.
//!
//! Every handler tags the request with a correlation ID and resolves the
//! actor from the `X-Actor-Id` header before reading any body. The work is
//! then delegated to the [`PayrollService`].

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, RecordId};
use crate::service::PayrollService;

use super::request::{
    ClearVoucherRequest, CreatePayrollRunRequest, EmployeePayItemRequest, PayItemTypeRequest,
    PenaltyRequest, SalaryStructureRequest,
};
use super::response::{ApiError, ApiErrorResponse, VoucherExportResponse};
use super::state::AppState;

/// Header carrying the id of the acting employee.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/payroll-runs",
            get(list_payroll_runs_handler).post(create_payroll_run_handler),
        )
        .route("/payroll-runs/:id", get(payroll_run_detail_handler))
        .route("/payroll-runs/:id/lock", post(lock_payroll_run_handler))
        .route(
            "/payroll-runs/:id/cleared-vouchers",
            get(cleared_vouchers_handler),
        )
        .route("/payslips/:id/clear-voucher", post(clear_voucher_handler))
        .route(
            "/salary-structures",
            get(list_salary_structures_handler).post(create_salary_structure_handler),
        )
        .route("/salary-structures/:id", put(update_salary_structure_handler))
        .route(
            "/pay-item-types",
            get(list_pay_item_types_handler).post(create_pay_item_type_handler),
        )
        .route("/pay-item-types/:id", put(update_pay_item_type_handler))
        .route(
            "/employee-pay-items",
            get(list_pay_items_handler).post(create_pay_item_handler),
        )
        .route("/employee-pay-items/:id", put(update_pay_item_handler))
        .route(
            "/penalties",
            get(list_penalties_handler).post(create_penalty_handler),
        )
        .route("/penalties/:id", put(update_penalty_handler))
        .with_state(state)
}

/// Reads the actor id from the request headers.
fn actor_id(headers: &HeaderMap) -> PayrollResult<RecordId> {
    let value = headers
        .get(ACTOR_HEADER)
        .ok_or_else(|| PayrollError::Unauthenticated {
            message: "missing X-Actor-Id header".to_string(),
        })?;
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| PayrollError::Unauthenticated {
            message: "X-Actor-Id must be an employee id".to_string(),
        })
}

/// Maps a JSON extraction failure to a 400 response.
fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message is in the body text
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Resolves the acting employee, or renders the 401 response.
fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: Uuid,
) -> Result<Employee, Response> {
    actor_id(headers)
        .and_then(|id| state.service().resolve_actor(id))
        .map_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Authentication failed");
            ApiErrorResponse::from(err).into_response()
        })
}

/// Resolves the actor and runs `action` against the service.
fn handle<T, F>(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: Uuid,
    action: &'static str,
    status: StatusCode,
    f: F,
) -> Response
where
    T: Serialize,
    F: FnOnce(&PayrollService, &Employee) -> PayrollResult<T>,
{
    match authenticate(state, headers, correlation_id) {
        Ok(actor) => respond(state, &actor, correlation_id, action, status, f),
        Err(response) => response,
    }
}

/// Like [`handle`], for requests with a JSON body.
///
/// The actor is resolved before the body is looked at, so an anonymous
/// request is answered with 401 whatever its payload.
fn handle_json<R, T, F>(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: Uuid,
    action: &'static str,
    status: StatusCode,
    payload: Result<Json<R>, JsonRejection>,
    f: F,
) -> Response
where
    T: Serialize,
    F: FnOnce(&PayrollService, &Employee, R) -> PayrollResult<T>,
{
    let actor = match authenticate(state, headers, correlation_id) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection).into_response(),
    };
    respond(state, &actor, correlation_id, action, status, |service, actor| {
        f(service, actor, request)
    })
}

/// Runs `action` for an authenticated actor.
///
/// Successful results are returned as JSON with `status`; failures are
/// mapped through [`ApiErrorResponse`].
fn respond<T, F>(
    state: &AppState,
    actor: &Employee,
    correlation_id: Uuid,
    action: &'static str,
    status: StatusCode,
    f: F,
) -> Response
where
    T: Serialize,
    F: FnOnce(&PayrollService, &Employee) -> PayrollResult<T>,
{
    let start_time = Instant::now();

    match f(state.service(), actor) {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                action,
                actor = %actor.username,
                status = status.as_u16(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Request completed"
            );
            (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                action,
                actor = %actor.username,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /payroll-runs.
async fn list_payroll_runs_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(&state, &headers, correlation_id, "list_payroll_runs", StatusCode::OK, |service, actor| {
        service.list_payroll_runs(actor)
    })
}

/// Handler for POST /payroll-runs.
///
/// Creates the run for the requested month and computes every payslip.
async fn create_payroll_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreatePayrollRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    handle_json(
        &state,
        &headers,
        correlation_id,
        "create_payroll_run",
        StatusCode::CREATED,
        payload,
        |service, actor, request| service.create_payroll_run(request.month, actor),
    )
}

/// Handler for GET /payroll-runs/:id.
async fn payroll_run_detail_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(&state, &headers, correlation_id, "payroll_run_detail", StatusCode::OK, |service, actor| {
        service.payroll_run_detail(id, actor)
    })
}

/// Handler for POST /payroll-runs/:id/lock.
async fn lock_payroll_run_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(&state, &headers, correlation_id, "lock_payroll_run", StatusCode::OK, |service, actor| {
        service.lock_payroll_run(id, actor)
    })
}

/// Handler for GET /payroll-runs/:id/cleared-vouchers.
async fn cleared_vouchers_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(
        &state,
        &headers,
        correlation_id,
        "cleared_voucher_export",
        StatusCode::OK,
        |service, actor| {
            service
                .cleared_voucher_export(id, actor)
                .map(VoucherExportResponse::from)
        },
    )
}

/// Handler for POST /payslips/:id/clear-voucher.
///
/// The body is optional; when present it may carry clearance notes.
async fn clear_voucher_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    body: Bytes,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, payslip_id = id, "Processing voucher clearance");

    let actor = match authenticate(&state, &headers, correlation_id) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ClearVoucherRequest::default()
    } else {
        match serde_json::from_slice::<ClearVoucherRequest>(&body) {
            Ok(req) => req,
            Err(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                return ApiErrorResponse::bad_request(ApiError::malformed_json(format!(
                    "Invalid JSON syntax: {}",
                    err
                )))
                .into_response();
            }
        }
    };

    respond(&state, &actor, correlation_id, "clear_voucher", StatusCode::OK, |service, actor| {
        service.clear_voucher(id, request.notes, actor)
    })
}

/// Handler for GET /salary-structures.
async fn list_salary_structures_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(
        &state,
        &headers,
        correlation_id,
        "list_salary_structures",
        StatusCode::OK,
        |service, actor| service.list_salary_structures(actor),
    )
}

/// Handler for POST /salary-structures.
async fn create_salary_structure_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SalaryStructureRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "create_salary_structure",
        StatusCode::CREATED,
        payload,
        |service, actor, request| service.create_salary_structure(request.into(), actor),
    )
}

/// Handler for PUT /salary-structures/:id.
async fn update_salary_structure_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    payload: Result<Json<SalaryStructureRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "update_salary_structure",
        StatusCode::OK,
        payload,
        |service, actor, request| service.update_salary_structure(id, request.into(), actor),
    )
}

/// Handler for GET /pay-item-types.
async fn list_pay_item_types_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(
        &state,
        &headers,
        correlation_id,
        "list_pay_item_types",
        StatusCode::OK,
        |service, actor| service.list_pay_item_types(actor),
    )
}

/// Handler for POST /pay-item-types.
async fn create_pay_item_type_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PayItemTypeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "create_pay_item_type",
        StatusCode::CREATED,
        payload,
        |service, actor, request| service.create_pay_item_type(request.into(), actor),
    )
}

/// Handler for PUT /pay-item-types/:id.
async fn update_pay_item_type_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    payload: Result<Json<PayItemTypeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "update_pay_item_type",
        StatusCode::OK,
        payload,
        |service, actor, request| service.update_pay_item_type(id, request.into(), actor),
    )
}

/// Handler for GET /employee-pay-items.
async fn list_pay_items_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(&state, &headers, correlation_id, "list_pay_items", StatusCode::OK, |service, actor| {
        service.list_pay_items(actor)
    })
}

/// Handler for POST /employee-pay-items.
async fn create_pay_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<EmployeePayItemRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "create_pay_item",
        StatusCode::CREATED,
        payload,
        |service, actor, request| service.create_pay_item(request.into(), actor),
    )
}

/// Handler for PUT /employee-pay-items/:id.
async fn update_pay_item_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    payload: Result<Json<EmployeePayItemRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "update_pay_item",
        StatusCode::OK,
        payload,
        |service, actor, request| service.update_pay_item(id, request.into(), actor),
    )
}

/// Handler for GET /penalties.
async fn list_penalties_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let correlation_id = Uuid::new_v4();
    handle(&state, &headers, correlation_id, "list_penalties", StatusCode::OK, |service, actor| {
        service.list_penalties(actor)
    })
}

/// Handler for POST /penalties.
async fn create_penalty_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PenaltyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "create_penalty",
        StatusCode::CREATED,
        payload,
        |service, actor, request| service.create_penalty(request.into(), actor),
    )
}

/// Handler for PUT /penalties/:id.
async fn update_penalty_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<RecordId>,
    payload: Result<Json<PenaltyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    handle_json(
        &state,
        &headers,
        correlation_id,
        "update_penalty",
        StatusCode::OK,
        payload,
        |service, actor, request| service.update_penalty(id, request.into(), actor),
    )
}
