//! Request types for the cleaning operations API.
//!
//! JSON bodies reuse the domain drafts and records directly; this module
//! only adds the query strings and the few bodies with no domain type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ComplaintStatus, NotificationPriority};
use crate::notifications::{NotificationFilter, PANEL_LIMIT};
use crate::payroll::WorkLogDraftRow;
use crate::receipt::ReceiptFormat;

/// Body of `POST /payroll/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Work-log rows as entered.
    #[serde(default)]
    pub work_log: Vec<WorkLogDraftRow>,
    /// Advances and other deductions.
    #[serde(default)]
    pub deductions: Decimal,
}

/// `?format=` on payment and receipt endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ReceiptQuery {
    /// Receipt format; PDF when omitted.
    #[serde(default)]
    pub format: ReceiptFormat,
}

/// `?limit=` on list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

/// Query of `GET /notifications`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications.
    #[serde(default)]
    pub unread: bool,
    /// Only notifications of this priority. Ignored when `unread` is set.
    pub priority: Option<NotificationPriority>,
    /// Maximum number of notifications; the panel limit when omitted.
    pub limit: Option<usize>,
}

impl NotificationQuery {
    /// The filter this query selects.
    pub fn filter(&self) -> NotificationFilter {
        match (self.unread, self.priority) {
            (true, _) => NotificationFilter::Unread,
            (false, Some(priority)) => NotificationFilter::Priority(priority),
            (false, None) => NotificationFilter::All,
        }
    }

    /// The row limit this query selects.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(PANEL_LIMIT)
    }
}

/// Query of `GET /complaints`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ComplaintQuery {
    /// Only complaints in this status.
    pub status: Option<ComplaintStatus>,
}

/// Query of `GET /staff`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffQuery {
    /// Case-insensitive name or branch search.
    #[serde(default)]
    pub q: String,
}

/// Body of `PUT /financials/revenue/:branch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueRequest {
    /// Revenue for the branch.
    pub revenue: Decimal,
}
