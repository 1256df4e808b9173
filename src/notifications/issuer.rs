//! Stores the notifications that committed mutations call for.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::models::Notification;
use crate::services::{CommitHook, MutationEvent};
use crate::store::{EntityClient, RowStore};

use super::trigger::notification_for;

/// A [`CommitHook`] that turns qualifying events into stored notifications.
///
/// Failing to store a notification is logged and swallowed; the mutation
/// that raised the event has already been committed.
#[derive(Clone)]
pub struct NotificationIssuer {
    notifications: EntityClient<Notification>,
}

impl NotificationIssuer {
    /// Creates an issuer writing to the given store.
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            notifications: EntityClient::new(store),
        }
    }
}

#[async_trait]
impl CommitHook for NotificationIssuer {
    async fn after_commit(&self, event: &MutationEvent) {
        let Some(notification) = notification_for(event) else {
            debug!(event = event.name(), id = event.record_id(), "No notification needed");
            return;
        };

        match self.notifications.create(&notification).await {
            Ok(stored) => info!(
                event = event.name(),
                related_id = event.record_id(),
                notification_id = %stored.id,
                title = %stored.record.title,
                "Notification issued"
            ),
            Err(e) => error!(
                event = event.name(),
                related_id = event.record_id(),
                title = %notification.title,
                error = %e,
                "Failed to issue notification"
            ),
        }
    }
}
