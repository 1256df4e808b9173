//! Rules that turn committed mutations into notifications.
//!
//! | Change                                   | Notification              |
//! |------------------------------------------|---------------------------|
//! | Branch saved as Minor Issue / Critical    | `branch_status`           |
//! | Complaint logged or edited at High / Critical | `complaint`           |
//!
//! Critical sources give `critical` notifications; everything else that
//! qualifies gives `high`.

use crate::models::{
    Branch, BranchStatus, Complaint, Notification, NotificationKind, NotificationPriority,
    Priority,
};
use crate::services::MutationEvent;

/// Whether a complaint was just logged or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintChange {
    /// Newly logged.
    Created,
    /// Edited.
    Updated,
}

/// The notification for a saved branch, if its status warrants one.
///
/// # Example
///
/// ```
/// use cleaning_ops::models::{Branch, BranchStatus, NotificationPriority};
/// use cleaning_ops::notifications::branch_status_notification;
///
/// let mut branch = Branch::named("Galle Fort");
/// branch.status = BranchStatus::Critical;
///
/// let notification = branch_status_notification("b-7", &branch).unwrap();
/// assert_eq!(notification.title, "Branch Status: Critical");
/// assert_eq!(
///     notification.message,
///     "Galle Fort status changed to Critical. Immediate attention required!"
/// );
/// assert_eq!(notification.priority, NotificationPriority::Critical);
///
/// branch.status = BranchStatus::Active;
/// assert!(branch_status_notification("b-7", &branch).is_none());
/// ```
pub fn branch_status_notification(id: &str, branch: &Branch) -> Option<Notification> {
    if !branch.status.needs_attention() {
        return None;
    }
    let critical = branch.status == BranchStatus::Critical;
    let follow_up = if critical {
        "Immediate attention required!"
    } else {
        "Please review the situation."
    };

    Some(Notification {
        title: format!("Branch Status: {}", branch.status),
        message: format!(
            "{} status changed to {}. {}",
            branch.branch_name, branch.status, follow_up
        ),
        kind: NotificationKind::BranchStatus,
        priority: if critical {
            NotificationPriority::Critical
        } else {
            NotificationPriority::High
        },
        related_id: Some(id.to_string()),
        related_entity: Some("branch".to_string()),
        is_read: false,
    })
}

/// The notification for a saved complaint, if its priority warrants one.
pub fn complaint_notification(
    id: &str,
    complaint: &Complaint,
    change: ComplaintChange,
) -> Option<Notification> {
    if !complaint.priority.is_escalated() {
        return None;
    }
    let priority = complaint.priority.as_str();
    let lower = priority.to_lowercase();

    let (title, message) = match change {
        ComplaintChange::Created => (
            format!("{} Priority Complaint", priority),
            format!(
                "New {} priority complaint logged at {}: {}",
                lower, complaint.branch, complaint.description
            ),
        ),
        ComplaintChange::Updated => (
            format!("{} Priority Complaint Updated", priority),
            format!(
                "Complaint at {} updated to {} priority: {}",
                complaint.branch, lower, complaint.description
            ),
        ),
    };

    Some(Notification {
        title,
        message,
        kind: NotificationKind::Complaint,
        priority: if complaint.priority == Priority::Critical {
            NotificationPriority::Critical
        } else {
            NotificationPriority::High
        },
        related_id: Some(id.to_string()),
        related_entity: Some("complaint".to_string()),
        is_read: false,
    })
}

/// The notification an event should raise, if any.
pub fn notification_for(event: &MutationEvent) -> Option<Notification> {
    match event {
        MutationEvent::BranchUpdated { id, branch } => branch_status_notification(id, branch),
        MutationEvent::ComplaintCreated { id, complaint } => {
            complaint_notification(id, complaint, ComplaintChange::Created)
        }
        MutationEvent::ComplaintUpdated { id, complaint } => {
            complaint_notification(id, complaint, ComplaintChange::Updated)
        }
    }
}
