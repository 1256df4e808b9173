//! Branch model and its operational status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::null_as_default;

/// Operational status of a branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchStatus {
    /// Operating normally.
    #[default]
    Active,
    /// Operating with a problem that should be reviewed.
    #[serde(rename = "Minor Issue")]
    MinorIssue,
    /// Needs immediate attention.
    Critical,
    /// Temporarily closed for works.
    Renovation,
}

impl BranchStatus {
    /// Returns the status exactly as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::MinorIssue => "Minor Issue",
            Self::Critical => "Critical",
            Self::Renovation => "Renovation",
        }
    }

    /// Returns true for statuses that raise an alert when a branch moves into them.
    ///
    /// ```
    /// use cleaning_ops::models::BranchStatus;
    ///
    /// assert!(BranchStatus::Critical.needs_attention());
    /// assert!(BranchStatus::MinorIssue.needs_attention());
    /// assert!(!BranchStatus::Renovation.needs_attention());
    /// ```
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::MinorIssue | Self::Critical)
    }
}

impl fmt::Display for BranchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical service location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name; other records refer to the branch by this value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch_name: String,
    /// Branch manager name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    /// Manager phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_phone: Option<String>,
    /// Branch contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_contact: Option<String>,
    /// Backup contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_contact: Option<String>,
    /// Current operational status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BranchStatus,
    /// Maps link for the location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

impl Branch {
    /// Creates an active branch with only a name set.
    pub fn named(branch_name: impl Into<String>) -> Self {
        Self {
            branch_name: branch_name.into(),
            ..Self::default()
        }
    }
}
