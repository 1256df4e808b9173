//! In-process row store.
//!
//! Used for local runs and tests. Behaves like the remote store: ids and
//! creation timestamps are assigned on create, updates merge fields, and
//! every call is independent. Failures can be injected per operation or
//! per record to exercise error paths.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex as StdMutex;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{OpsError, OpsResult};

use super::{Collection, Predicates, Row, RowStore, SortSpec, StoreOp};

#[derive(Default)]
struct FailurePlan {
    operations: HashSet<(Collection, StoreOp)>,
    records: HashSet<(Collection, String)>,
}

/// An in-memory [`RowStore`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Collection, Vec<Row>>>,
    last_created: StdMutex<Option<DateTime<Utc>>>,
    failures: StdMutex<FailurePlan>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `op` on `collection` fail until cleared.
    pub fn fail_operation(&self, collection: Collection, op: StoreOp) {
        if let Ok(mut plan) = self.failures.lock() {
            plan.operations.insert((collection, op));
        }
    }

    /// Makes updates and deletes of one record fail until cleared.
    pub fn fail_record(&self, collection: Collection, id: impl Into<String>) {
        if let Ok(mut plan) = self.failures.lock() {
            plan.records.insert((collection, id.into()));
        }
    }

    /// Removes every injected failure.
    pub fn clear_failures(&self) {
        if let Ok(mut plan) = self.failures.lock() {
            *plan = FailurePlan::default();
        }
    }

    fn check(&self, collection: Collection, op: StoreOp, id: Option<&str>) -> OpsResult<()> {
        let plan = self
            .failures
            .lock()
            .map_err(|_| OpsError::store(collection.table_name(), op.as_str(), "store poisoned"))?;
        let record_fails =
            id.is_some_and(|id| plan.records.contains(&(collection, id.to_string())));
        if plan.operations.contains(&(collection, op)) || record_fails {
            return Err(OpsError::store(
                collection.table_name(),
                op.as_str(),
                "injected failure",
            ));
        }
        Ok(())
    }

    /// Strictly increasing creation timestamps keep newest-first ordering stable.
    fn next_created_date(&self) -> String {
        let now = Utc::now();
        let stamp = match self.last_created.lock() {
            Ok(mut last) => {
                let stamp = match *last {
                    Some(prev) if now <= prev => prev + Duration::microseconds(1),
                    _ => now,
                };
                *last = Some(stamp);
                stamp
            }
            Err(_) => now,
        };
        stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

fn matches(row: &Row, predicates: &Predicates) -> bool {
    predicates
        .iter()
        .all(|(field, expected)| row.get(field).is_some_and(|actual| loosely_equal(actual, expected)))
}

/// Numbers compare by value so `5` matches `5.0`.
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn filter(
        &self,
        collection: Collection,
        predicates: &Predicates,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> OpsResult<Vec<Row>> {
        let op = if predicates.is_empty() {
            StoreOp::List
        } else {
            StoreOp::Filter
        };
        self.check(collection, op, None)?;

        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(&collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, predicates))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&sort.field), b.get(&sort.field));
                if sort.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn create(&self, collection: Collection, mut fields: Row) -> OpsResult<Row> {
        self.check(collection, StoreOp::Create, None)?;

        let id = Uuid::new_v4().to_string();
        fields.insert("id".to_string(), Value::String(id.clone()));
        fields.insert(
            "created_date".to_string(),
            Value::String(self.next_created_date()),
        );

        self.tables
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(fields.clone());
        debug!(collection = %collection, id = %id, "Row created");
        Ok(fields)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Row) -> OpsResult<Row> {
        self.check(collection, StoreOp::Update, Some(id))?;

        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(&collection)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get("id").and_then(Value::as_str) == Some(id))
            })
            .ok_or_else(|| OpsError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        for (field, value) in fields {
            if field != "id" && field != "created_date" {
                row.insert(field, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> OpsResult<bool> {
        self.check(collection, StoreOp::Delete, Some(id))?;

        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(&collection) else {
            return Ok(false);
        };
        let before = rows.len();
        rows.retain(|row| row.get("id").and_then(Value::as_str) != Some(id));
        Ok(rows.len() < before)
    }
}
