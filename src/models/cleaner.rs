//! Staff (cleaner) model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::null_as_default;

/// Job role of a staff member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    /// Cleaning staff.
    #[default]
    Cleaner,
    /// Assistant.
    Assistant,
    /// Supervisor.
    Supervisor,
    /// Manager.
    Manager,
}

impl StaffRole {
    /// Returns the role exactly as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleaner => "Cleaner",
            Self::Assistant => "Assistant",
            Self::Supervisor => "Supervisor",
            Self::Manager => "Manager",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment status of a staff member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffStatus {
    /// Currently working.
    #[default]
    Active,
    /// Temporarily away.
    #[serde(rename = "On Leave")]
    OnLeave,
    /// No longer employed.
    Resigned,
}

/// An employee record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cleaner {
    /// Full name; payments refer to the staff member by this value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Current job role.
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: StaffRole,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Name of the branch the staff member is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_branch: Option<String>,
    /// Employment status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: StaffStatus,
    /// Profile photo, either a URL or an embedded data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Cleaner {
    /// Creates an active cleaner with the given name and role.
    pub fn new(name: impl Into<String>, role: StaffRole) -> Self {
        Self {
            name: name.into(),
            role,
            ..Self::default()
        }
    }

    /// Case-insensitive match against the name or assigned branch.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self
                .assigned_branch
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&query))
    }
}
