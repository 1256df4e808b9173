//! Generic row store client.
//!
//! Every collection supports the same five operations: list, filter,
//! create, update and delete. Backends implement [`RowStore`] over untyped
//! JSON rows; [`EntityClient`] layers typed records on top.

mod client;
mod memory;
mod rest;

pub use client::{Entity, EntityClient, Stored};
pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{OpsError, OpsResult};

/// A single untyped row.
pub type Row = serde_json::Map<String, Value>;

/// Field → exact value equality predicates.
pub type Predicates = BTreeMap<String, Value>;

/// The named collections of the table store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Branches.
    Branch,
    /// Staff.
    Cleaner,
    /// Complaints.
    Complaint,
    /// Notifications.
    Notification,
    /// Payment records.
    SalaryLog,
}

impl Collection {
    /// Every collection.
    pub const ALL: [Collection; 5] = [
        Collection::Branch,
        Collection::Cleaner,
        Collection::Complaint,
        Collection::Notification,
        Collection::SalaryLog,
    ];

    /// Returns the table name in the store.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Branch => "Branch",
            Self::Cleaner => "Cleaner",
            Self::Complaint => "Complaint",
            Self::Notification => "Notification",
            Self::SalaryLog => "SalaryLog",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// A sort order: a field name, optionally prefixed with `-` for descending.
///
/// ```
/// use cleaning_ops::store::SortSpec;
///
/// let sort: SortSpec = "-created_date".parse().unwrap();
/// assert_eq!(sort.field, "created_date");
/// assert!(sort.descending);
/// assert_eq!(sort.to_string(), "-created_date");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Sort descending when true.
    pub descending: bool,
}

impl SortSpec {
    /// Ascending by `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending by `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Newest first by creation timestamp.
    pub fn newest_first() -> Self {
        Self::desc("created_date")
    }
}

impl FromStr for SortSpec {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, descending) = match s.strip_prefix('-') {
            Some(field) => (field, true),
            None => (s, false),
        };
        if field.is_empty() {
            return Err(OpsError::validation("sort", "sort field must not be empty"));
        }
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// The store operations, used in error reports and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// List rows.
    List,
    /// Filter rows.
    Filter,
    /// Create a row.
    Create,
    /// Update a row.
    Update,
    /// Delete a row.
    Delete,
}

impl StoreOp {
    /// Returns the operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Filter => "filter",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// An untyped row store.
///
/// Backends assign `id` and `created_date` on create. No operation spans
/// more than one row, and none is retried.
#[async_trait]
pub trait RowStore: Send + Sync + 'static {
    /// Returns rows matching every predicate, sorted and limited.
    async fn filter(
        &self,
        collection: Collection,
        predicates: &Predicates,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> OpsResult<Vec<Row>>;

    /// Inserts a row and returns it as stored.
    async fn create(&self, collection: Collection, fields: Row) -> OpsResult<Row>;

    /// Merges `fields` into the row with the given id and returns it.
    async fn update(&self, collection: Collection, id: &str, fields: Row) -> OpsResult<Row>;

    /// Deletes the row with the given id.
    async fn delete(&self, collection: Collection, id: &str) -> OpsResult<bool>;

    /// Returns all rows, sorted and limited.
    async fn list(
        &self,
        collection: Collection,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> OpsResult<Vec<Row>> {
        self.filter(collection, &Predicates::new(), sort, limit).await
    }
}

/// Opens the configured backend.
pub fn connect(config: &StoreConfig) -> OpsResult<Arc<dyn RowStore>> {
    match config {
        StoreConfig::Memory => {
            info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreConfig::Rest { base_url, api_key } => {
            info!(base_url = %base_url, "Using REST store");
            Ok(Arc::new(RestStore::new(base_url.clone(), api_key)?))
        }
    }
}
