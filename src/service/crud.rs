//! Generic CRUD execution against PostgreSQL.

use crate::error::ApiError;
use crate::schema::TableSchema;
use crate::sql::{delete_by_pk, insert, select_all, select_by_pk, update_by_pk, PgBindValue, QueryBuf};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

/// Page window for list queries. `limit: None` lists everything.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    pub skip: i64,
    pub limit: Option<i64>,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 100;

    /// skip/limit from query parameters, defaulting to 0/100. Unparsable or
    /// negative values fall back to the defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Page {
        let skip = params
            .get("skip")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n >= 0)
            .unwrap_or(0);
        let limit = params
            .get("limit")
            .and_then(|v| v.parse().ok())
            .filter(|n| *n >= 0)
            .unwrap_or(Self::DEFAULT_LIMIT);
        Page {
            skip,
            limit: Some(limit),
        }
    }

    pub fn unlimited() -> Page {
        Page { skip: 0, limit: None }
    }
}

pub struct CrudService;

impl CrudService {
    /// List rows in storage order within the page window.
    pub async fn list(pool: &PgPool, table: &TableSchema, page: Page) -> Result<Vec<Value>, ApiError> {
        let q = select_all(table, page.skip, page.limit);
        Self::query_many(pool, &q).await
    }

    /// Fetch one row by primary key. Returns a JSON object or None.
    pub async fn read(pool: &PgPool, table: &TableSchema, id: &Value) -> Result<Option<Value>, ApiError> {
        let mut q = select_by_pk(table);
        q.params.push(id.clone());
        Self::query_optional(pool, &q).await
    }

    /// Insert the write set; the database fills generated ids and defaults.
    /// Returns the persisted row.
    pub async fn create(
        pool: &PgPool,
        table: &TableSchema,
        write: &HashMap<String, Value>,
    ) -> Result<Value, ApiError> {
        let q = insert(table, write);
        Self::query_optional(pool, &q)
            .await?
            .ok_or(ApiError::Db(sqlx::Error::RowNotFound))
    }

    /// Update one row by id with the write set. Returns the updated row or
    /// None when the row does not exist.
    pub async fn update(
        pool: &PgPool,
        table: &TableSchema,
        id: &Value,
        write: &HashMap<String, Value>,
    ) -> Result<Option<Value>, ApiError> {
        let q = update_by_pk(table, id, write);
        Self::query_optional(pool, &q).await
    }

    /// Delete one row by id. Returns the removed row or None.
    pub async fn delete(pool: &PgPool, table: &TableSchema, id: &Value) -> Result<Option<Value>, ApiError> {
        let mut q = delete_by_pk(table);
        q.params.push(id.clone());
        Self::query_optional(pool, &q).await
    }

    async fn query_optional(pool: &PgPool, q: &QueryBuf) -> Result<Option<Value>, ApiError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_many(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, ApiError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = cell_to_value(row, name);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(v) = row.try_get::<Option<i16>, _>(name) {
        if let Some(n) = v {
            return Value::Number(n.into());
        }
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(name) {
        if let Some(n) = v {
            return Value::Number(n.into());
        }
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(name) {
        if let Some(n) = v {
            return Value::Number(n.into());
        }
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = v {
            if let Some(n) = serde_json::Number::from_f64(n as f64) {
                return Value::Number(n);
            }
        }
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = v {
            if let Some(n) = serde_json::Number::from_f64(n) {
                return Value::Number(n);
            }
        }
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(name) {
        if let Some(b) = v {
            return Value::Bool(b);
        }
    }
    if let Ok(v) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        if let Some(u) = v {
            return Value::String(u.to_string());
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        if let Some(d) = v {
            return Value::String(d.to_rfc3339());
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        if let Some(d) = v {
            return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
        }
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        if let Some(d) = v {
            return Value::String(d.format("%Y-%m-%d").to_string());
        }
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(name) {
        if let Some(s) = v {
            return Value::String(s);
        }
    }
    if let Ok(v) = row.try_get::<Option<serde_json::Value>, _>(name) {
        if let Some(j) = v {
            return j;
        }
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_defaults_to_skip_0_limit_100() {
        let p = Page::from_params(&HashMap::new());
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, Some(100));
    }

    #[test]
    fn page_parses_skip_and_limit() {
        let p = Page::from_params(&params(&[("skip", "30"), ("limit", "5")]));
        assert_eq!(p.skip, 30);
        assert_eq!(p.limit, Some(5));
    }

    #[test]
    fn page_ignores_garbage_and_negatives() {
        let p = Page::from_params(&params(&[("skip", "abc"), ("limit", "-1")]));
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, Some(100));
    }

    #[test]
    fn unlimited_page_has_no_limit() {
        let p = Page::unlimited();
        assert_eq!(p.skip, 0);
        assert_eq!(p.limit, None);
    }
}
