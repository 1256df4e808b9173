//! Complaint records.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::{OpsError, OpsResult};
use crate::models::{Complaint, ComplaintStatus};
use crate::store::{EntityClient, Predicates, RowStore, SortSpec, Stored};

use super::events::{CommitHooks, MutationEvent};

/// Logs, edits and lists complaints.
///
/// Creates and updates publish a [`MutationEvent`] once the store has
/// accepted them.
#[derive(Clone)]
pub struct ComplaintService {
    complaints: EntityClient<Complaint>,
    hooks: CommitHooks,
}

impl ComplaintService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn RowStore>, hooks: CommitHooks) -> Self {
        Self {
            complaints: EntityClient::new(store),
            hooks,
        }
    }

    /// Lists complaints newest first, optionally only those in one status.
    pub async fn list(&self, status: Option<ComplaintStatus>) -> OpsResult<Vec<Stored<Complaint>>> {
        let mut predicates = Predicates::new();
        if let Some(status) = status {
            if let Ok(value) = serde_json::to_value(status) {
                predicates.insert("status".to_string(), value);
            }
        }
        self.complaints
            .filter(predicates, Some(SortSpec::newest_first()), None)
            .await
    }

    /// Fetches one complaint.
    pub async fn get(&self, id: &str) -> OpsResult<Stored<Complaint>> {
        self.complaints.get(id).await
    }

    /// Logs a complaint and publishes it.
    pub async fn create(&self, complaint: &Complaint) -> OpsResult<Stored<Complaint>> {
        validate(complaint)?;
        let stored = self.complaints.create(complaint).await?;
        info!(
            id = %stored.id,
            branch = %stored.record.branch,
            priority = %stored.record.priority,
            "Complaint logged"
        );
        self.hooks
            .publish(MutationEvent::ComplaintCreated {
                id: stored.id.clone(),
                complaint: stored.record.clone(),
            })
            .await;
        Ok(stored)
    }

    /// Saves an edited complaint and publishes it.
    pub async fn update(&self, id: &str, complaint: &Complaint) -> OpsResult<Stored<Complaint>> {
        validate(complaint)?;
        let stored = self.complaints.update(id, complaint).await?;
        info!(
            id = %stored.id,
            priority = %stored.record.priority,
            "Complaint updated"
        );
        self.hooks
            .publish(MutationEvent::ComplaintUpdated {
                id: stored.id.clone(),
                complaint: stored.record.clone(),
            })
            .await;
        Ok(stored)
    }

    /// Deletes a complaint.
    pub async fn delete(&self, id: &str) -> OpsResult<bool> {
        let deleted = self.complaints.delete(id).await?;
        info!(id = %id, deleted, "Complaint deleted");
        Ok(deleted)
    }

    /// Number of complaints still Open or In Progress.
    pub async fn open_count(&self) -> OpsResult<usize> {
        Ok(Self::count_open(&self.list(None).await?))
    }

    /// Counts open complaints in an already-fetched list.
    pub fn count_open(complaints: &[Stored<Complaint>]) -> usize {
        complaints.iter().filter(|c| c.record.is_open()).count()
    }
}

fn validate(complaint: &Complaint) -> OpsResult<()> {
    if complaint.branch.trim().is_empty() {
        return Err(OpsError::validation("branch", "Branch is required"));
    }
    if complaint.description.trim().is_empty() {
        return Err(OpsError::validation("description", "Description is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use crate::services::events::tests::RecordingHook;
    use crate::store::MemoryStore;

    fn service() -> (Arc<RecordingHook>, ComplaintService) {
        let hook = Arc::new(RecordingHook::default());
        let service = ComplaintService::new(
            Arc::new(MemoryStore::new()),
            CommitHooks::new().with(hook.clone()),
        );
        (hook, service)
    }

    #[tokio::test]
    async fn test_required_fields() {
        let (hook, service) = service();
        let err = service
            .create(&Complaint::new("", "Late", Priority::High))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::Validation { ref field, .. } if field == "branch"));

        let err = service
            .create(&Complaint::new("Kandy", " ", Priority::High))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::Validation { ref field, .. } if field == "description"));
        assert!(hook.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_update_publish() {
        let (hook, service) = service();
        let created = service
            .create(&Complaint::new("Kandy", "Late", Priority::Medium))
            .await
            .unwrap();

        let mut complaint = created.record.clone();
        complaint.priority = Priority::Critical;
        service.update(&created.id, &complaint).await.unwrap();

        let events = hook.events.lock().await;
        let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["complaint_created", "complaint_updated"]);
        assert!(events.iter().all(|e| e.record_id() == created.id));
    }

    #[tokio::test]
    async fn test_status_filter_and_open_count() {
        let (_, service) = service();
        let mut resolved = Complaint::new("A", "Fixed", Priority::Low);
        resolved.status = ComplaintStatus::Resolved;
        let mut working = Complaint::new("B", "Ongoing", Priority::Low);
        working.status = ComplaintStatus::InProgress;
        for complaint in [Complaint::new("C", "New", Priority::Low), resolved, working] {
            service.create(&complaint).await.unwrap();
        }

        assert_eq!(service.open_count().await.unwrap(), 2);
        let in_progress = service.list(Some(ComplaintStatus::InProgress)).await.unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].record.branch, "B");

        let all = service.list(None).await.unwrap();
        assert_eq!(all[0].record.branch, "B");
    }
}
