//! Staff records.

use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::error::{OpsError, OpsResult};
use crate::financials::{StaffHistory, staff_history};
use crate::models::{Cleaner, SalaryLog, StaffStatus};
use crate::store::{EntityClient, Predicates, Row, RowStore, SortSpec, Stored};

use super::uploads::{embed_image, validate_image_url};

/// Manages the staff roster.
#[derive(Clone)]
pub struct StaffService {
    staff: EntityClient<Cleaner>,
    payments: EntityClient<SalaryLog>,
    max_upload_bytes: usize,
}

impl StaffService {
    /// Creates a service over the given store.
    pub fn new(store: Arc<dyn RowStore>, max_upload_bytes: usize) -> Self {
        Self {
            staff: EntityClient::new(Arc::clone(&store)),
            payments: EntityClient::new(store),
            max_upload_bytes,
        }
    }

    /// Lists every staff member, newest first.
    pub async fn list(&self) -> OpsResult<Vec<Stored<Cleaner>>> {
        self.staff.list(Some(SortSpec::newest_first()), None).await
    }

    /// Fetches one staff member.
    pub async fn get(&self, id: &str) -> OpsResult<Stored<Cleaner>> {
        self.staff.get(id).await
    }

    /// Staff whose name or assigned branch contains `query`, ignoring case.
    ///
    /// A blank query returns everyone.
    pub async fn search(&self, query: &str) -> OpsResult<Vec<Stored<Cleaner>>> {
        let query = query.trim();
        let mut staff = self.list().await?;
        if !query.is_empty() {
            staff.retain(|s| s.record.matches(query));
        }
        Ok(staff)
    }

    /// Adds a staff member.
    pub async fn create(&self, cleaner: &Cleaner) -> OpsResult<Stored<Cleaner>> {
        self.validate(cleaner)?;
        let stored = self.staff.create(cleaner).await?;
        info!(id = %stored.id, name = %stored.record.name, role = %stored.record.role, "Staff member added");
        Ok(stored)
    }

    /// Saves an edited staff member.
    pub async fn update(&self, id: &str, cleaner: &Cleaner) -> OpsResult<Stored<Cleaner>> {
        self.validate(cleaner)?;
        let stored = self.staff.update(id, cleaner).await?;
        info!(id = %stored.id, name = %stored.record.name, "Staff member updated");
        Ok(stored)
    }

    /// Removes a staff member. Their payments are kept.
    pub async fn delete(&self, id: &str) -> OpsResult<bool> {
        let deleted = self.staff.delete(id).await?;
        info!(id = %id, deleted, "Staff member deleted");
        Ok(deleted)
    }

    /// Embeds an uploaded photo on a staff member.
    pub async fn set_photo(&self, id: &str, mime: &str, bytes: &[u8]) -> OpsResult<Stored<Cleaner>> {
        let url = embed_image("photo_url", mime, bytes, self.max_upload_bytes)?;
        let mut fields = Row::new();
        fields.insert("photo_url".to_string(), Value::String(url));
        self.staff.update_fields(id, fields).await
    }

    /// A staff member's payments and lifetime totals.
    pub async fn history(&self, id: &str) -> OpsResult<StaffHistory> {
        let cleaner = self.staff.get(id).await?.record;
        let mut predicates = Predicates::new();
        predicates.insert("staff_name".to_string(), Value::String(cleaner.name.clone()));
        let payments = self.payments.filter(predicates, None, None).await?;

        let name = cleaner.name.clone();
        staff_history(&[cleaner], &payments)
            .into_iter()
            .next()
            .ok_or_else(|| OpsError::RecordNotFound {
                collection: "Cleaner".to_string(),
                id: name,
            })
    }

    /// Number of staff currently [`StaffStatus::Active`].
    pub fn active_count(staff: &[Stored<Cleaner>]) -> usize {
        staff
            .iter()
            .filter(|s| s.record.status == StaffStatus::Active)
            .count()
    }

    fn validate(&self, cleaner: &Cleaner) -> OpsResult<()> {
        if cleaner.name.trim().is_empty() {
            return Err(OpsError::validation("name", "Name is required"));
        }
        if let Some(url) = cleaner.photo_url.as_deref() {
            if url.starts_with("data:") {
                validate_image_url("photo_url", url, self.max_upload_bytes)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::tests::stored_payment;
    use crate::models::StaffRole;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    fn service() -> (Arc<MemoryStore>, StaffService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), StaffService::new(store, 64))
    }

    #[tokio::test]
    async fn test_name_is_required() {
        let (_, service) = service();
        let err = service
            .create(&Cleaner::new(" ", StaffRole::Cleaner))
            .await
            .unwrap_err();
        assert!(matches!(err, OpsError::Validation { ref field, .. } if field == "name"));
    }

    #[tokio::test]
    async fn test_search_by_name_or_branch() {
        let (_, service) = service();
        let mut nimal = Cleaner::new("Nimal Perera", StaffRole::Cleaner);
        nimal.assigned_branch = Some("Kandy".to_string());
        service.create(&nimal).await.unwrap();
        service
            .create(&Cleaner::new("Kamala Silva", StaffRole::Supervisor))
            .await
            .unwrap();

        assert_eq!(service.search("kandy").await.unwrap().len(), 1);
        assert_eq!(service.search("SILVA").await.unwrap()[0].record.name, "Kamala Silva");
        assert_eq!(service.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_photo_upload_respects_limit() {
        let (_, service) = service();
        let created = service
            .create(&Cleaner::new("Nimal", StaffRole::Cleaner))
            .await
            .unwrap();

        let updated = service.set_photo(&created.id, "image/png", &[1, 2, 3]).await.unwrap();
        assert_eq!(updated.record.photo_url.as_deref(), Some("data:image/png;base64,AQID"));

        let err = service
            .set_photo(&created.id, "image/png", &[0u8; 65])
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_history_only_counts_own_payments() {
        let (store, service) = service();
        let created = service
            .create(&Cleaner::new("Nimal", StaffRole::Cleaner))
            .await
            .unwrap();
        let payments: EntityClient<SalaryLog> = EntityClient::new(store);
        for payment in [
            stored_payment("Nimal", Some("January"), None, 5000, 1000, "[]"),
            stored_payment("Nimal", Some("February"), None, 3000, 0, "[]"),
            stored_payment("Kamala", Some("January"), None, 9000, 0, "[]"),
        ] {
            payments.create(&payment.record).await.unwrap();
        }

        let history = service.history(&created.id).await.unwrap();
        assert_eq!(history.payment_count, 2);
        assert_eq!(history.total_paid, Decimal::from(7000));
    }
}
