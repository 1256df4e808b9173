//! HTTP API module for the cleaning operations engine.
//!
//! This module provides the JSON endpoints for payroll, receipts,
//! financial views, notifications, entity records and the dashboard.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, NotificationQuery, RevenueRequest};
pub use response::{ApiError, ApiErrorResponse, PaymentResponse, ReceiptBody};
pub use state::AppState;
