//! Response types for the payroll API.
//!
//! This module defines the error response structures, the mapping from
//! [`PayrollError`] to HTTP status codes, and the export response body.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::models::{RecordId, VoucherExport, VoucherExportRow};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            PayrollError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "NOT_FOUND",
                    message,
                    format!("No {} exists with the requested id", entity),
                ),
            ),
            PayrollError::UniqueViolation { entity, key } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "UNIQUE_VIOLATION",
                    message,
                    format!("A {} with {} already exists", entity, key),
                ),
            ),
            PayrollError::RunLocked { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "RUN_LOCKED",
                    "Payroll run is locked.",
                    message,
                ),
            ),
            PayrollError::PendingPenalties { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "PENDING_PENALTIES",
                    "Cannot clear salary voucher: employee has pending penalties for this month.",
                    message,
                ),
            ),
            PayrollError::Unauthenticated { .. } => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHENTICATED", message),
            ),
            PayrollError::PermissionDenied { .. } => (
                StatusCode::FORBIDDEN,
                ApiError::new("PERMISSION_DENIED", message),
            ),
            PayrollError::InvalidInput { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "VALIDATION_ERROR",
                    message,
                    format!("Check the value of '{}'", field),
                ),
            ),
            PayrollError::StorePoisoned => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("STORE_UNAVAILABLE", message),
            ),
        };
        Self { status, error }
    }
}

/// Response body for `GET /payroll-runs/:id/cleared-vouchers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherExportResponse {
    /// The exported run.
    pub run_id: RecordId,
    /// The run's month as `YYYY-MM`.
    pub period: String,
    /// One row per cleared voucher, ordered by username.
    pub rows: Vec<VoucherExportRow>,
}

impl From<VoucherExport> for VoucherExportResponse {
    fn from(export: VoucherExport) -> Self {
        Self {
            run_id: export.run.id,
            period: export.run.period_label(),
            rows: export.rows,
        }
    }
}
