//! Complaint model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::null_as_default;

/// Category of a complaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintType {
    /// Quality of the cleaning itself.
    #[default]
    #[serde(rename = "Service Quality")]
    ServiceQuality,
    /// Conduct of staff.
    #[serde(rename = "Staff Behavior")]
    StaffBehavior,
    /// Equipment problems.
    Equipment,
    /// Scheduling problems.
    Schedule,
    /// Safety concerns.
    Safety,
    /// Anything else.
    Other,
}

/// Severity of a complaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
    /// Critical.
    Critical,
}

impl Priority {
    /// Returns the priority exactly as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Returns true for priorities that raise an alert.
    pub fn is_escalated(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution status of a complaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    /// Newly logged.
    #[default]
    Open,
    /// Being worked on.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Fixed.
    Resolved,
    /// Closed without further action.
    Closed,
}

/// A logged service issue at a branch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    /// Date the complaint was raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Name of the branch the complaint concerns.
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch: String,
    /// Category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub complaint_type: ComplaintType,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Severity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    /// Resolution status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ComplaintStatus,
}

impl Complaint {
    /// Creates an open complaint.
    pub fn new(branch: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            branch: branch.into(),
            description: description.into(),
            priority,
            ..Self::default()
        }
    }

    /// Returns true while the complaint still needs work.
    pub fn is_open(&self) -> bool {
        matches!(self.status, ComplaintStatus::Open | ComplaintStatus::InProgress)
    }
}
