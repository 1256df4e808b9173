//! Response types for the cleaning operations API.
//!
//! This module defines the JSON bodies returned by handlers and the
//! mapping from [`OpsError`] to HTTP error responses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OpsError;
use crate::models::{Notification, SalaryLog};
use crate::payroll::PaymentOutcome;
use crate::receipt::ReceiptArtifact;
use crate::store::Stored;

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
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
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

impl From<OpsError> for ApiErrorResponse {
    fn from(error: OpsError) -> Self {
        let message = error.to_string();
        match error {
            OpsError::ConfigNotFound { .. } | OpsError::ConfigParseError { .. } => {
                ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                }
            }
            OpsError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details("VALIDATION_ERROR", message, field),
            },
            OpsError::Store { .. } => ApiErrorResponse {
                status: StatusCode::BAD_GATEWAY,
                error: ApiError::with_details("STORE_ERROR", "The table store request failed", message),
            },
            OpsError::MalformedRecord { .. } | OpsError::WorkLogParse { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("STORE_ERROR", "A stored record could not be read", message),
            },
            OpsError::RecordNotFound { collection, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NOT_FOUND",
                    format!("{} '{}' does not exist", collection, id),
                    message,
                ),
            },
            OpsError::Receipt { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("RECEIPT_ERROR", "Receipt could not be rendered", message),
            },
            OpsError::Io { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("IO_ERROR", "A local file could not be written", message),
            },
        }
    }
}

/// A receipt embedded in a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptBody {
    /// Suggested download name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// File contents, base64 encoded.
    pub content_base64: String,
}

impl From<ReceiptArtifact> for ReceiptBody {
    fn from(receipt: ReceiptArtifact) -> Self {
        Self {
            file_name: receipt.file_name,
            content_type: receipt.content_type.to_string(),
            content_base64: STANDARD.encode(&receipt.bytes),
        }
    }
}

/// Body returned after recording or editing a payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    /// The payment as stored.
    pub payment: Stored<SalaryLog>,
    /// The receipt, absent when rendering failed after the save.
    pub receipt: Option<ReceiptBody>,
}

impl From<PaymentOutcome> for PaymentResponse {
    fn from(outcome: PaymentOutcome) -> Self {
        Self {
            payment: outcome.payment,
            receipt: outcome.receipt.map(ReceiptBody::from),
        }
    }
}

/// Body of `GET /notifications`.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationsResponse {
    /// Unread notifications in the whole store.
    pub unread_count: usize,
    /// The requested page, newest first.
    pub notifications: Vec<Stored<Notification>>,
}

/// Body returned after setting a branch's revenue.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueResponse {
    /// Branch name.
    pub branch: String,
    /// Revenue now recorded.
    pub revenue: Decimal,
}

/// Body of a delete endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Whether a record was removed.
    pub deleted: bool,
}
