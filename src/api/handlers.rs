//! HTTP request handlers for the cleaning operations API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler tags its log lines with a fresh correlation id.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::dashboard::DashboardSnapshot;
use crate::error::{OpsError, OpsResult};
use crate::financials::FinancialOverview;
use crate::models::{Branch, Cleaner, Complaint};
use crate::payroll::{PaymentDraft, compute_payroll};
use crate::receipt::ReceiptArtifact;

use super::request::{
    CalculationRequest, ComplaintQuery, LimitQuery, NotificationQuery, ReceiptQuery,
    RevenueRequest, StaffQuery,
};
use super::response::{
    ApiError, ApiErrorResponse, DeleteResponse, NotificationsResponse, PaymentResponse,
    RevenueResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/receipt", post(preview_receipt_handler))
        .route(
            "/payroll/payments",
            get(list_payments_handler).post(record_payment_handler),
        )
        .route(
            "/payroll/payments/:id",
            put(edit_payment_handler).delete(delete_payment_handler),
        )
        .route("/payroll/payments/:id/draft", get(payment_draft_handler))
        .route("/payroll/payments/:id/receipt", get(payment_receipt_handler))
        .route("/payroll/payments/:id/slip", put(attach_slip_handler))
        .route("/financials", get(financials_handler))
        .route("/financials/revenue/:branch", put(set_revenue_handler))
        .route("/notifications", get(list_notifications_handler))
        .route("/notifications/read-all", post(mark_all_read_handler))
        .route("/notifications/:id/read", post(mark_read_handler))
        .route("/notifications/:id", delete(delete_notification_handler))
        .route("/branches", get(list_branches_handler).post(create_branch_handler))
        .route(
            "/branches/:id",
            put(update_branch_handler).delete(delete_branch_handler),
        )
        .route(
            "/complaints",
            get(list_complaints_handler).post(create_complaint_handler),
        )
        .route(
            "/complaints/:id",
            put(update_complaint_handler).delete(delete_complaint_handler),
        )
        .route("/staff", get(list_staff_handler).post(create_staff_handler))
        .route(
            "/staff/:id",
            put(update_staff_handler).delete(delete_staff_handler),
        )
        .route("/staff/:id/history", get(staff_history_handler))
        .route("/staff/:id/photo", put(staff_photo_handler))
        .route("/dashboard", get(dashboard_handler))
        .with_state(state)
}

// =============================================================================
// Response helpers
// =============================================================================

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, action: &str, err: OpsError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    if api_error.status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            code = %api_error.error.code,
            details = ?api_error.error.details,
            "{} failed",
            action
        );
    } else {
        warn!(
            correlation_id = %correlation_id,
            code = %api_error.error.code,
            message = %api_error.error.message,
            "{} rejected",
            action
        );
    }
    api_error.into_response()
}

/// Serializes a successful result, or maps its error.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    action: &str,
    status: StatusCode,
    result: OpsResult<T>,
) -> Response {
    match result {
        Ok(body) => json_response(status, &body),
        Err(err) => error_response(correlation_id, action, err),
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
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
    json_response(StatusCode::BAD_REQUEST, &error)
}

fn receipt_response(receipt: ReceiptArtifact) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, receipt.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", receipt.file_name),
            ),
        ],
        receipt.bytes,
    )
        .into_response()
}

fn content_type(headers: &HeaderMap) -> &str {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

// =============================================================================
// Payroll
// =============================================================================

/// Handler for POST /payroll/calculate.
///
/// Computes totals for a work log without validating or saving anything.
async fn calculate_handler(payload: Result<Json<CalculationRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let computation = match compute_payroll(&request.work_log, request.deductions) {
        Ok(computation) => computation,
        Err(err) => return error_response(correlation_id, "Payroll calculation", err),
    };
    info!(
        correlation_id = %correlation_id,
        rows = request.work_log.len(),
        excluded_rows = computation.excluded_rows,
        gross_total = %computation.gross_total,
        net_pay = %computation.net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll calculated"
    );
    json_response(StatusCode::OK, &computation)
}

/// Handler for POST /payroll/receipt.
///
/// Renders the receipt a draft would produce, without saving it.
async fn preview_receipt_handler(
    State(state): State<AppState>,
    Query(query): Query<ReceiptQuery>,
    payload: Result<Json<PaymentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, format = %query.format, "Rendering receipt preview");

    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state.payroll().preview_receipt(&draft, query.format).await {
        Ok(receipt) => {
            info!(
                correlation_id = %correlation_id,
                file_name = %receipt.file_name,
                bytes = receipt.bytes.len(),
                "Receipt rendered"
            );
            receipt_response(receipt)
        }
        Err(err) => error_response(correlation_id, "Receipt preview", err),
    }
}

/// Handler for GET /payroll/payments.
async fn list_payments_handler(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.payroll().list_payments(query.limit).await;
    respond(correlation_id, "List payments", StatusCode::OK, result)
}

/// Handler for POST /payroll/payments.
async fn record_payment_handler(
    State(state): State<AppState>,
    Query(query): Query<ReceiptQuery>,
    payload: Result<Json<PaymentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payment");

    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = state
        .payroll()
        .record_payment(&draft, query.format)
        .await
        .map(PaymentResponse::from);
    respond(correlation_id, "Record payment", StatusCode::CREATED, result)
}

/// Handler for PUT /payroll/payments/:id.
async fn edit_payment_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReceiptQuery>,
    payload: Result<Json<PaymentDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, id = %id, "Processing payment edit");

    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = state
        .payroll()
        .edit_payment(&id, &draft, query.format)
        .await
        .map(PaymentResponse::from);
    respond(correlation_id, "Edit payment", StatusCode::OK, result)
}

/// Handler for DELETE /payroll/payments/:id.
async fn delete_payment_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .payroll()
        .delete_payment(&id)
        .await
        .map(|deleted| DeleteResponse { deleted });
    respond(correlation_id, "Delete payment", StatusCode::OK, result)
}

/// Handler for GET /payroll/payments/:id/draft.
async fn payment_draft_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.payroll().draft_for(&id).await;
    respond(correlation_id, "Reopen payment", StatusCode::OK, result)
}

/// Handler for GET /payroll/payments/:id/receipt.
async fn payment_receipt_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReceiptQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.payroll().receipt_for(&id, query.format).await {
        Ok(receipt) => receipt_response(receipt),
        Err(err) => error_response(correlation_id, "Payment receipt", err),
    }
}

/// Handler for PUT /payroll/payments/:id/slip.
///
/// The body is the raw image; its Content-Type must be an image type.
async fn attach_slip_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, id = %id, bytes = body.len(), "Attaching transaction slip");
    let result = state
        .payroll()
        .attach_slip(&id, content_type(&headers), &body)
        .await;
    respond(correlation_id, "Attach slip", StatusCode::OK, result)
}

// =============================================================================
// Financials
// =============================================================================

/// Handler for GET /financials.
async fn financials_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    let revenues = state.revenues().lock().await.clone();

    match FinancialOverview::fetch(state.store(), &revenues).await {
        Ok(overview) => {
            info!(
                correlation_id = %correlation_id,
                payments = overview.totals.payment_count,
                skipped = overview.skipped_payments.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Financial overview computed"
            );
            json_response(StatusCode::OK, &overview)
        }
        Err(err) => error_response(correlation_id, "Financial overview", err),
    }
}

/// Handler for PUT /financials/revenue/:branch.
async fn set_revenue_handler(
    State(state): State<AppState>,
    Path(branch): Path<String>,
    payload: Result<Json<RevenueRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = state
        .revenues()
        .lock()
        .await
        .set(branch.clone(), request.revenue)
        .map(|()| RevenueResponse {
            branch,
            revenue: request.revenue,
        });
    if let Ok(saved) = &result {
        info!(correlation_id = %correlation_id, branch = %saved.branch, revenue = %saved.revenue, "Revenue set");
    }
    respond(correlation_id, "Set revenue", StatusCode::OK, result)
}

// =============================================================================
// Notifications
// =============================================================================

/// Handler for GET /notifications.
async fn list_notifications_handler(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = notification_page(&state, query).await;
    respond(correlation_id, "List notifications", StatusCode::OK, result)
}

async fn notification_page(
    state: &AppState,
    query: NotificationQuery,
) -> OpsResult<NotificationsResponse> {
    let center = state.notifications();
    Ok(NotificationsResponse {
        notifications: center.list(query.filter(), Some(query.limit())).await?,
        unread_count: center.unread_count().await?,
    })
}

/// Handler for POST /notifications/read-all.
async fn mark_all_read_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Marking all notifications read");
    let result = state.notifications().mark_all_read().await;
    respond(correlation_id, "Mark all read", StatusCode::OK, result)
}

/// Handler for POST /notifications/:id/read.
async fn mark_read_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.notifications().mark_read(&id).await;
    respond(correlation_id, "Mark read", StatusCode::OK, result)
}

/// Handler for DELETE /notifications/:id.
async fn delete_notification_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .notifications()
        .delete(&id)
        .await
        .map(|deleted| DeleteResponse { deleted });
    respond(correlation_id, "Delete notification", StatusCode::OK, result)
}

// =============================================================================
// Branches
// =============================================================================

/// Handler for GET /branches.
async fn list_branches_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.branches().list().await;
    respond(correlation_id, "List branches", StatusCode::OK, result)
}

/// Handler for POST /branches.
async fn create_branch_handler(
    State(state): State<AppState>,
    payload: Result<Json<Branch>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let branch = match payload {
        Ok(Json(branch)) => branch,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.branches().create(&branch).await;
    respond(correlation_id, "Create branch", StatusCode::CREATED, result)
}

/// Handler for PUT /branches/:id.
async fn update_branch_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Branch>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let branch = match payload {
        Ok(Json(branch)) => branch,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.branches().update(&id, &branch).await;
    respond(correlation_id, "Update branch", StatusCode::OK, result)
}

/// Handler for DELETE /branches/:id.
async fn delete_branch_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .branches()
        .delete(&id)
        .await
        .map(|deleted| DeleteResponse { deleted });
    respond(correlation_id, "Delete branch", StatusCode::OK, result)
}

// =============================================================================
// Complaints
// =============================================================================

/// Handler for GET /complaints.
async fn list_complaints_handler(
    State(state): State<AppState>,
    Query(query): Query<ComplaintQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.complaints().list(query.status).await;
    respond(correlation_id, "List complaints", StatusCode::OK, result)
}

/// Handler for POST /complaints.
async fn create_complaint_handler(
    State(state): State<AppState>,
    payload: Result<Json<Complaint>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let complaint = match payload {
        Ok(Json(complaint)) => complaint,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.complaints().create(&complaint).await;
    respond(correlation_id, "Create complaint", StatusCode::CREATED, result)
}

/// Handler for PUT /complaints/:id.
async fn update_complaint_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Complaint>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let complaint = match payload {
        Ok(Json(complaint)) => complaint,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.complaints().update(&id, &complaint).await;
    respond(correlation_id, "Update complaint", StatusCode::OK, result)
}

/// Handler for DELETE /complaints/:id.
async fn delete_complaint_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .complaints()
        .delete(&id)
        .await
        .map(|deleted| DeleteResponse { deleted });
    respond(correlation_id, "Delete complaint", StatusCode::OK, result)
}

// =============================================================================
// Staff
// =============================================================================

/// Handler for GET /staff.
async fn list_staff_handler(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.staff().search(&query.q).await;
    respond(correlation_id, "List staff", StatusCode::OK, result)
}

/// Handler for POST /staff.
async fn create_staff_handler(
    State(state): State<AppState>,
    payload: Result<Json<Cleaner>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let cleaner = match payload {
        Ok(Json(cleaner)) => cleaner,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.staff().create(&cleaner).await;
    respond(correlation_id, "Create staff", StatusCode::CREATED, result)
}

/// Handler for PUT /staff/:id.
async fn update_staff_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Cleaner>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let cleaner = match payload {
        Ok(Json(cleaner)) => cleaner,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let result = state.staff().update(&id, &cleaner).await;
    respond(correlation_id, "Update staff", StatusCode::OK, result)
}

/// Handler for DELETE /staff/:id.
async fn delete_staff_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .staff()
        .delete(&id)
        .await
        .map(|deleted| DeleteResponse { deleted });
    respond(correlation_id, "Delete staff", StatusCode::OK, result)
}

/// Handler for GET /staff/:id/history.
async fn staff_history_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.staff().history(&id).await;
    respond(correlation_id, "Staff history", StatusCode::OK, result)
}

/// Handler for PUT /staff/:id/photo.
///
/// The body is the raw image; its Content-Type must be an image type.
async fn staff_photo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, id = %id, bytes = body.len(), "Uploading staff photo");
    let result = state
        .staff()
        .set_photo(&id, content_type(&headers), &body)
        .await;
    respond(correlation_id, "Staff photo", StatusCode::OK, result)
}

// =============================================================================
// Dashboard
// =============================================================================

/// Handler for GET /dashboard.
async fn dashboard_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = DashboardSnapshot::fetch(state.store()).await;
    respond(correlation_id, "Dashboard", StatusCode::OK, result)
}
