//! Typed access to store collections.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

use crate::error::{OpsError, OpsResult};
use crate::models::{Branch, Cleaner, Complaint, Notification, SalaryLog};

use super::{Collection, Predicates, Row, RowStore, SortSpec};

/// A domain record that lives in a store collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection holding records of this type.
    const COLLECTION: Collection;

    /// Optional columns, omitted from the encoded row while unset.
    ///
    /// A full update writes `null` to each one that is absent so the store
    /// clears it.
    const OPTIONAL_FIELDS: &'static [&'static str] = &[];
}

impl Entity for Branch {
    const COLLECTION: Collection = Collection::Branch;
    const OPTIONAL_FIELDS: &'static [&'static str] = &[
        "manager",
        "manager_phone",
        "branch_contact",
        "backup_contact",
        "map_link",
    ];
}

impl Entity for Cleaner {
    const COLLECTION: Collection = Collection::Cleaner;
    const OPTIONAL_FIELDS: &'static [&'static str] = &["phone", "assigned_branch", "photo_url"];
}

impl Entity for Complaint {
    const COLLECTION: Collection = Collection::Complaint;
    const OPTIONAL_FIELDS: &'static [&'static str] = &["date"];
}

impl Entity for Notification {
    const COLLECTION: Collection = Collection::Notification;
    const OPTIONAL_FIELDS: &'static [&'static str] = &["related_id", "related_entity"];
}

impl Entity for SalaryLog {
    const COLLECTION: Collection = Collection::SalaryLog;
    const OPTIONAL_FIELDS: &'static [&'static str] =
        &["date", "month", "role", "transaction_slip_url"];
}

/// A record together with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    /// Store-assigned id.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    /// Store-assigned creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    /// The record's own fields.
    #[serde(flatten)]
    pub record: T,
}

/// Accepts numeric and string ids alike.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or numeric id, got {}",
            other
        ))),
    }
}

/// Typed client for one collection.
pub struct EntityClient<T> {
    store: Arc<dyn RowStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity> EntityClient<T> {
    /// Creates a client over the given store.
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Lists every record.
    ///
    /// Rows that do not decode as `T` are logged and left out.
    pub async fn list(
        &self,
        sort: Option<SortSpec>,
        limit: Option<usize>,
    ) -> OpsResult<Vec<Stored<T>>> {
        let rows = self
            .store
            .list(T::COLLECTION, sort.as_ref(), limit)
            .await?;
        Ok(decode_rows(rows))
    }

    /// Lists records whose fields equal the given values.
    ///
    /// Rows that do not decode as `T` are logged and left out.
    pub async fn filter(
        &self,
        predicates: Predicates,
        sort: Option<SortSpec>,
        limit: Option<usize>,
    ) -> OpsResult<Vec<Stored<T>>> {
        let rows = self
            .store
            .filter(T::COLLECTION, &predicates, sort.as_ref(), limit)
            .await?;
        Ok(decode_rows(rows))
    }

    /// Fetches one record by id.
    ///
    /// Unlike the listing calls, a row that does not decode is an error.
    pub async fn get(&self, id: &str) -> OpsResult<Stored<T>> {
        let mut predicates = Predicates::new();
        predicates.insert("id".to_string(), Value::String(id.to_string()));
        let row = self
            .store
            .filter(T::COLLECTION, &predicates, None, Some(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OpsError::RecordNotFound {
                collection: T::COLLECTION.to_string(),
                id: id.to_string(),
            })?;
        decode_row(row)
    }

    /// Creates a record.
    pub async fn create(&self, record: &T) -> OpsResult<Stored<T>> {
        let row = self.store.create(T::COLLECTION, encode_record(record)?).await?;
        decode_row(row)
    }

    /// Replaces every field of a record.
    ///
    /// Unset optional fields are written as `null`, clearing any stored value.
    pub async fn update(&self, id: &str, record: &T) -> OpsResult<Stored<T>> {
        let mut fields = encode_record(record)?;
        for field in T::OPTIONAL_FIELDS {
            fields.entry(field.to_string()).or_insert(Value::Null);
        }
        self.update_fields(id, fields).await
    }

    /// Updates only the given fields of a record.
    pub async fn update_fields(&self, id: &str, fields: Row) -> OpsResult<Stored<T>> {
        let row = self.store.update(T::COLLECTION, id, fields).await?;
        decode_row(row)
    }

    /// Deletes a record.
    pub async fn delete(&self, id: &str) -> OpsResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}

fn encode_record<T: Entity>(record: &T) -> OpsResult<Row> {
    let malformed = |message: String| OpsError::MalformedRecord {
        collection: T::COLLECTION.to_string(),
        message,
    };
    match serde_json::to_value(record).map_err(|e| malformed(e.to_string()))? {
        Value::Object(row) => Ok(row),
        other => Err(malformed(format!("expected an object, got {}", other))),
    }
}

fn decode_row<T: Entity>(row: Row) -> OpsResult<Stored<T>> {
    serde_json::from_value(Value::Object(row)).map_err(|e| OpsError::MalformedRecord {
        collection: T::COLLECTION.to_string(),
        message: e.to_string(),
    })
}

fn decode_rows<T: Entity>(rows: Vec<Row>) -> Vec<Stored<T>> {
    rows.into_iter()
        .filter_map(|row| {
            let id = match row.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            match decode_row(row) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    warn!(
                        collection = %T::COLLECTION,
                        id = %id,
                        error = %e,
                        "Skipping undecodable row"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BranchStatus, Priority};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn branches() -> EntityClient<Branch> {
        EntityClient::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let client = branches();
        let stored = client.create(&Branch::named("Colombo 03")).await.unwrap();

        assert!(!stored.id.is_empty());
        assert!(stored.created_date.is_some());
        assert_eq!(stored.record.branch_name, "Colombo 03");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let client = branches();
        match client.get("missing").await {
            Err(OpsError::RecordNotFound { collection, id }) => {
                assert_eq!(collection, "Branch");
                assert_eq!(id, "missing");
            }
            other => panic!("Expected RecordNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_fields_merges() {
        let client = branches();
        let stored = client.create(&Branch::named("Kandy")).await.unwrap();

        let mut fields = Row::new();
        fields.insert("status".to_string(), json!("Critical"));
        let updated = client.update_fields(&stored.id, fields).await.unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.record.branch_name, "Kandy");
        assert_eq!(updated.record.status, BranchStatus::Critical);
    }

    #[tokio::test]
    async fn test_update_clears_unset_optional_fields() {
        let client = branches();
        let mut branch = Branch::named("Galle");
        branch.manager = Some("Sunil".to_string());
        branch.map_link = Some("https://maps.example/galle".to_string());
        let stored = client.create(&branch).await.unwrap();

        branch.manager = None;
        let updated = client.update(&stored.id, &branch).await.unwrap();
        assert_eq!(updated.record.manager, None);
        assert_eq!(
            updated.record.map_link.as_deref(),
            Some("https://maps.example/galle")
        );

        let reread = client.get(&stored.id).await.unwrap();
        assert_eq!(reread.record.manager, None);
    }

    #[tokio::test]
    async fn test_update_clears_payment_slip() {
        let payments: EntityClient<SalaryLog> = EntityClient::new(Arc::new(MemoryStore::new()));
        let stored = payments
            .create(
                &serde_json::from_value(json!({
                    "payment_id": "PAY-1",
                    "staff_name": "Nimal Perera",
                    "transaction_slip_url": "data:image/png;base64,iVBORw=="
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        let mut payment = stored.record.clone();
        payment.transaction_slip_url = None;
        let updated = payments.update(&stored.id, &payment).await.unwrap();

        assert_eq!(updated.record.transaction_slip_url, None);
        assert_eq!(updated.record.payment_id, "PAY-1");
    }

    #[tokio::test]
    async fn test_listing_skips_undecodable_rows() {
        let store: Arc<dyn RowStore> = Arc::new(MemoryStore::new());
        let good = json!({"payment_id": "PAY-1", "staff_name": "Nimal Perera", "month": "March"});
        let bad = json!({"payment_id": "PAY-2", "staff_name": "Nimal Perera", "month": "Smarch"});
        for row in [good, bad] {
            let Value::Object(row) = row else { unreachable!() };
            store.create(Collection::SalaryLog, row).await.unwrap();
        }
        let payments: EntityClient<SalaryLog> = EntityClient::new(store);

        let listed = payments.list(None, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].record.payment_id, "PAY-1");

        let mut predicates = Predicates::new();
        predicates.insert("staff_name".to_string(), json!("Nimal Perera"));
        let filtered = payments.filter(predicates, None, None).await.unwrap();
        assert_eq!(filtered.len(), 1);
    }

    #[tokio::test]
    async fn test_get_undecodable_row_is_malformed() {
        let store: Arc<dyn RowStore> = Arc::new(MemoryStore::new());
        let Value::Object(row) = json!({"payment_id": "PAY-2", "staff_name": "X", "month": "Smarch"})
        else {
            unreachable!()
        };
        let created = store.create(Collection::SalaryLog, row).await.unwrap();
        let id = match &created["id"] {
            Value::String(id) => id.clone(),
            other => other.to_string(),
        };
        let payments: EntityClient<SalaryLog> = EntityClient::new(store);

        assert!(matches!(
            payments.get(&id).await,
            Err(OpsError::MalformedRecord { .. })
        ));
    }

    #[tokio::test]
    async fn test_filter_by_exact_value() {
        let store: Arc<dyn RowStore> = Arc::new(MemoryStore::new());
        let complaints: EntityClient<Complaint> = EntityClient::new(store);
        complaints
            .create(&Complaint::new("A", "dusty", Priority::Low))
            .await
            .unwrap();
        complaints
            .create(&Complaint::new("B", "late", Priority::High))
            .await
            .unwrap();

        let mut predicates = Predicates::new();
        predicates.insert("branch".to_string(), json!("B"));
        let found = complaints.filter(predicates, None, None).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.description, "late");
    }

    #[test]
    fn test_numeric_ids_decode_as_strings() {
        let stored: Stored<Branch> =
            serde_json::from_value(json!({"id": 42, "branch_name": "Galle"})).unwrap();
        assert_eq!(stored.id, "42");
        assert_eq!(stored.created_date, None);
    }
}
