//! PostgREST-style remote row store.
//!
//! Speaks the query dialect of hosted Postgres table APIs:
//! `?field=eq.value`, `order=field.desc`, `limit=n`, and
//! `Prefer: return=representation` to get written rows back.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{OpsError, OpsResult};

use super::{Collection, Predicates, Row, RowStore, SortSpec, StoreOp};

/// A [`RowStore`] backed by a remote REST table API.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    /// Creates a client for `base_url` authenticated with `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: &str) -> OpsResult<Self> {
        let invalid_key = |e: reqwest::header::InvalidHeaderValue| OpsError::ConfigParseError {
            path: "store.api_key".to_string(),
            message: e.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(api_key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(invalid_key)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| OpsError::ConfigParseError {
                path: "store".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.table_name())
    }

    async fn send(
        &self,
        collection: Collection,
        op: StoreOp,
        request: RequestBuilder,
    ) -> OpsResult<Vec<Row>> {
        let failed =
            |message: String| OpsError::store(collection.table_name(), op.as_str(), message);

        let response = request.send().await.map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(collection = %collection, op = op.as_str(), status = %status, "Store request rejected");
            return Err(failed(format!("{}: {}", status, body)));
        }

        let body: Value = response.json().await.map_err(|e| failed(e.to_string()))?;
        rows_from_body(body).map_err(failed)
    }
}

/// Splits a response body into rows.
pub(crate) fn rows_from_body(body: Value) -> Result<Vec<Row>, String> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(format!("expected row object, got {}", other)),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        other => Err(format!("unexpected response body {}", other)),
    }
}

/// Builds the query string pairs for a filtered read.
pub(crate) fn query_params(
    predicates: &Predicates,
    sort: Option<&SortSpec>,
    limit: Option<usize>,
) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (field, value) in predicates {
        params.push((field.clone(), format!("eq.{}", predicate_value(value))));
    }
    if let Some(sort) = sort {
        let direction = if sort.descending { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{}.{}", sort.field, direction)));
    }
    if let Some(limit) = limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

fn predicate_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn id_param(id: &str) -> [(String, String); 1] {
    [("id".to_string(), format!("eq.{}", id))]
}

#[async_trait]
impl RowStore for RestStore {
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
        let request = self
            .client
            .get(self.table_url(collection))
            .query(&query_params(predicates, sort, limit));
        self.send(collection, op, request).await
    }

    async fn create(&self, collection: Collection, fields: Row) -> OpsResult<Row> {
        let request = self
            .client
            .post(self.table_url(collection))
            .header("Prefer", "return=representation")
            .json(&vec![Value::Object(fields)]);
        let row = self
            .send(collection, StoreOp::Create, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                OpsError::store(collection.table_name(), "create", "no row returned")
            })?;
        debug!(collection = %collection, "Row created");
        Ok(row)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Row) -> OpsResult<Row> {
        let request = self
            .client
            .patch(self.table_url(collection))
            .query(&id_param(id))
            .header("Prefer", "return=representation")
            .json(&Value::Object(fields));
        self.send(collection, StoreOp::Update, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| OpsError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn delete(&self, collection: Collection, id: &str) -> OpsResult<bool> {
        let request = self
            .client
            .delete(self.table_url(collection))
            .query(&id_param(id))
            .header("Prefer", "return=representation");
        let deleted = self.send(collection, StoreOp::Delete, request).await?;
        debug!(collection = %collection, id = %id, rows = deleted.len(), "Delete finished");
        Ok(!deleted.is_empty())
    }
}
