//! Notification model.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// What kind of event produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Raised by a complaint.
    Complaint,
    /// Raised by a branch status change.
    BranchStatus,
    /// Raised by a payment.
    Payment,
    /// Raised by a staff change.
    Staff,
    /// Anything else.
    System,
}

/// Urgency of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    /// Immediate attention required.
    Critical,
    /// Review soon.
    High,
    /// Normal.
    #[default]
    Medium,
    /// Informational.
    Low,
}

/// A derived alert record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Source kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Urgency.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: NotificationPriority,
    /// Id of the record that raised the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    /// Collection of the record that raised the notification (e.g., "branch").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    /// Whether an operator has read it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_as_type() {
        let notification = Notification {
            title: "t".to_string(),
            message: "m".to_string(),
            kind: NotificationKind::BranchStatus,
            priority: NotificationPriority::Critical,
            related_id: Some("b-1".to_string()),
            related_entity: Some("branch".to_string()),
            is_read: false,
        };

        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["type"], "branch_status");
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["is_read"], false);
    }

    #[test]
    fn test_missing_priority_defaults_to_medium() {
        let json = r#"{"title": "t", "message": "m", "type": "system", "is_read": null}"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.priority, NotificationPriority::Medium);
        assert!(!notification.is_read);
    }
}
