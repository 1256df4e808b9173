//! Derived alerts.
//!
//! [`trigger`] decides which committed mutations deserve a notification,
//! [`NotificationIssuer`] stores them after the fact, and
//! [`NotificationCenter`] is how operators read and clear them.

mod center;
mod issuer;
pub mod trigger;

pub use center::{MarkAllReadReport, NotificationCenter, NotificationFilter, PANEL_LIMIT};
pub use issuer::NotificationIssuer;
pub use trigger::{ComplaintChange, branch_status_notification, complaint_notification, notification_for};
