//! Reading and acknowledging notifications.

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::OpsResult;
use crate::models::{Notification, NotificationPriority};
use crate::store::{EntityClient, Predicates, Row, RowStore, SortSpec, Stored};

/// How many notifications the panel shows by default.
pub const PANEL_LIMIT: usize = 50;

/// Which notifications to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationFilter {
    /// Everything.
    #[default]
    All,
    /// Only notifications not yet read.
    Unread,
    /// Only notifications of one priority.
    Priority(NotificationPriority),
}

impl NotificationFilter {
    fn predicates(&self) -> Predicates {
        let mut predicates = Predicates::new();
        match self {
            Self::All => {}
            Self::Unread => {
                predicates.insert("is_read".to_string(), Value::Bool(false));
            }
            Self::Priority(priority) => {
                if let Ok(value) = serde_json::to_value(priority) {
                    predicates.insert("priority".to_string(), value);
                }
            }
        }
        predicates
    }
}

/// Result of a mark-all-read sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkAllReadReport {
    /// Notifications marked read.
    pub updated: usize,
    /// Ids whose update failed; they stay unread.
    pub failed: Vec<String>,
}

/// The operator's view over stored notifications.
#[derive(Clone)]
pub struct NotificationCenter {
    notifications: EntityClient<Notification>,
}

impl NotificationCenter {
    /// Creates a center over the given store.
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            notifications: EntityClient::new(store),
        }
    }

    /// Lists matching notifications, newest first.
    pub async fn list(
        &self,
        filter: NotificationFilter,
        limit: Option<usize>,
    ) -> OpsResult<Vec<Stored<Notification>>> {
        self.notifications
            .filter(filter.predicates(), Some(SortSpec::newest_first()), limit)
            .await
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self) -> OpsResult<usize> {
        Ok(self.unread().await?.len())
    }

    /// Marks one notification as read.
    pub async fn mark_read(&self, id: &str) -> OpsResult<Stored<Notification>> {
        self.notifications.update_fields(id, read_flag()).await
    }

    /// Deletes one notification.
    pub async fn delete(&self, id: &str) -> OpsResult<bool> {
        self.notifications.delete(id).await
    }

    /// Marks every notification unread at the time of the call as read.
    ///
    /// One update is issued per notification, all at once, and every one
    /// is awaited. Failed updates are reported and leave the rest in place.
    /// Notifications created after the snapshot are untouched.
    pub async fn mark_all_read(&self) -> OpsResult<MarkAllReadReport> {
        let unread = self.unread().await?;
        let results = join_all(
            unread
                .iter()
                .map(|n| self.notifications.update_fields(&n.id, read_flag())),
        )
        .await;

        let mut report = MarkAllReadReport::default();
        for (notification, result) in unread.iter().zip(results) {
            match result {
                Ok(_) => report.updated += 1,
                Err(e) => {
                    warn!(id = %notification.id, error = %e, "Failed to mark notification read");
                    report.failed.push(notification.id.clone());
                }
            }
        }
        info!(
            updated = report.updated,
            failed = report.failed.len(),
            "Marked notifications read"
        );
        Ok(report)
    }

    async fn unread(&self) -> OpsResult<Vec<Stored<Notification>>> {
        self.list(NotificationFilter::Unread, None).await
    }
}

fn read_flag() -> Row {
    let mut fields = Row::new();
    fields.insert("is_read".to_string(), Value::Bool(true));
    fields
}
