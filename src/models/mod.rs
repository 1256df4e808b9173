//! Core data models for the cleaning operations engine.
//!
//! Every record is a flat structure whose field names match the columns of
//! the table store. Branches and staff are referenced from other records by
//! name only; nothing enforces those links.

mod branch;
mod cleaner;
mod complaint;
mod notification;
mod salary_log;

pub use branch::{Branch, BranchStatus};
pub use cleaner::{Cleaner, StaffRole, StaffStatus};
pub use complaint::{Complaint, ComplaintStatus, ComplaintType, Priority};
pub use notification::{Notification, NotificationKind, NotificationPriority};
pub use salary_log::{PaymentStatus, SalaryLog, WorkLogBlob, WorkLogEntry, month_label};

use serde::{Deserialize, Deserializer};

/// Deserializes a possibly-null column into its type's default.
///
/// The table store returns `null` for unset columns, which `#[serde(default)]`
/// alone does not cover.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
