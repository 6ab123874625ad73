//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from reflected tables.

use crate::schema::TableSchema;
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL (names come from the reflected schema).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Fully qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// SELECT list: each column as-is, except numeric as ::float8 so JSON gets a
/// number back instead of a string.
fn select_column_list(table: &TableSchema) -> String {
    table
        .columns
        .iter()
        .map(|c| {
            let q = quoted(&c.name);
            if c.data_type == "numeric" {
                format!("{}::float8", q)
            } else {
                q
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Placeholder for the primary key, cast when the pk column is typed.
fn pk_placeholder(table: &TableSchema, n: u32) -> String {
    match table.column(&table.pk_column).and_then(|c| c.pg_type.as_deref()) {
        Some(t) => format!("${}::{}", n, t),
        None => format!("${}", n),
    }
}

/// SELECT all rows in storage order (no ORDER BY), with optional LIMIT/OFFSET.
pub fn select_all(table: &TableSchema, skip: i64, limit: Option<i64>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = select_column_list(table);
    let target = qualified_table(&table.schema_name, &table.table_name);
    let limit_clause = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
    let offset_clause = if skip > 0 {
        format!(" OFFSET {}", skip)
    } else {
        String::new()
    };
    q.sql = format!("SELECT {} FROM {}{}{}", cols, target, limit_clause, offset_clause);
    q
}

/// SELECT by primary key. Caller binds the id as the sole parameter.
pub fn select_by_pk(table: &TableSchema) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = select_column_list(table);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        cols,
        qualified_table(&table.schema_name, &table.table_name),
        quoted(&table.pk_column),
        pk_placeholder(table, 1)
    );
    q
}

/// INSERT from the reconciled write set, iterating reflected column order.
/// Uses SQL casts (e.g. $n::timestamptz) so string values bind to typed
/// columns. An empty write set inserts all defaults.
pub fn insert(table: &TableSchema, write: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let target = qualified_table(&table.schema_name, &table.table_name);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &table.columns {
        let Some(val) = write.get(&c.name) else { continue };
        let param_num = q.push_param(val.clone());
        let ph = c
            .pg_type
            .as_deref()
            .map(|t| format!("${}::{}", param_num, t))
            .unwrap_or_else(|| format!("${}", param_num));
        cols.push(quoted(&c.name));
        placeholders.push(ph);
    }
    let returning = select_column_list(table);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", target, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            target,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by primary key: SET only columns present in the write set, never
/// the primary key itself. An empty effective SET degenerates to a plain
/// SELECT so the caller still learns whether the row exists.
pub fn update_by_pk(table: &TableSchema, id: &Value, write: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let target = qualified_table(&table.schema_name, &table.table_name);
    let mut sets = Vec::new();
    for c in &table.columns {
        if c.primary_key {
            continue;
        }
        let Some(v) = write.get(&c.name) else { continue };
        let param_num = q.push_param(v.clone());
        let rhs = c
            .pg_type
            .as_deref()
            .map(|t| format!("${}::{}", param_num, t))
            .unwrap_or_else(|| format!("${}", param_num));
        sets.push(format!("{} = {}", quoted(&c.name), rhs));
    }
    let cols = select_column_list(table);
    if sets.is_empty() {
        let id_param = q.push_param(id.clone());
        q.sql = format!(
            "SELECT {} FROM {} WHERE {} = {}",
            cols,
            target,
            quoted(&table.pk_column),
            pk_placeholder(table, id_param)
        );
        return q;
    }
    let id_param = q.push_param(id.clone());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        target,
        sets.join(", "),
        quoted(&table.pk_column),
        pk_placeholder(table, id_param),
        cols
    );
    q
}

/// DELETE by primary key, returning the removed row. Caller binds the id as
/// the sole parameter.
pub fn delete_by_pk(table: &TableSchema) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols = select_column_list(table);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        qualified_table(&table.schema_name, &table.table_name),
        quoted(&table.pk_column),
        pk_placeholder(table, 1),
        cols
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMeta, PkType};
    use serde_json::json;

    fn col(name: &str, data_type: &str, pg_type: Option<&str>) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            nullable: true,
            has_default: false,
            primary_key: false,
            autoincrement: false,
            data_type: data_type.to_string(),
            pg_type: pg_type.map(String::from),
        }
    }

    fn service_table() -> TableSchema {
        let mut id = col("id", "integer", None);
        id.primary_key = true;
        id.nullable = false;
        id.has_default = true;
        id.autoincrement = true;
        TableSchema {
            schema_name: "public".into(),
            table_name: "marketplace_service".into(),
            pk_column: "id".into(),
            pk_type: PkType::Int,
            columns: vec![
                id,
                col("title", "character varying", None),
                col("price", "numeric", None),
                col("created_at", "timestamp with time zone", Some("timestamptz")),
            ],
        }
    }

    #[test]
    fn select_all_has_no_order_by() {
        let q = select_all(&service_table(), 0, None);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"title\", \"price\"::float8, \"created_at\" \
             FROM \"public\".\"marketplace_service\""
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_all_appends_limit_and_offset() {
        let q = select_all(&service_table(), 20, Some(10));
        assert!(q.sql.ends_with(" LIMIT 10 OFFSET 20"));
        let q = select_all(&service_table(), 0, Some(100));
        assert!(q.sql.ends_with(" LIMIT 100"));
    }

    #[test]
    fn insert_follows_column_order_and_casts() {
        let mut write = HashMap::new();
        write.insert("created_at".to_string(), json!("2024-05-01T10:00:00Z"));
        write.insert("title".to_string(), json!("Pipe fix"));
        let q = insert(&service_table(), &write);
        assert_eq!(
            q.sql,
            "INSERT INTO \"public\".\"marketplace_service\" (\"title\", \"created_at\") \
             VALUES ($1, $2::timestamptz) \
             RETURNING \"id\", \"title\", \"price\"::float8, \"created_at\""
        );
        assert_eq!(q.params, vec![json!("Pipe fix"), json!("2024-05-01T10:00:00Z")]);
    }

    #[test]
    fn empty_insert_uses_default_values() {
        let q = insert(&service_table(), &HashMap::new());
        assert!(q.sql.starts_with("INSERT INTO \"public\".\"marketplace_service\" DEFAULT VALUES RETURNING"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn update_sets_only_supplied_columns() {
        let mut write = HashMap::new();
        write.insert("title".to_string(), json!("New title"));
        let q = update_by_pk(&service_table(), &json!(5), &write);
        assert_eq!(
            q.sql,
            "UPDATE \"public\".\"marketplace_service\" SET \"title\" = $1 WHERE \"id\" = $2 \
             RETURNING \"id\", \"title\", \"price\"::float8, \"created_at\""
        );
        assert_eq!(q.params, vec![json!("New title"), json!(5)]);
    }

    #[test]
    fn update_never_sets_the_primary_key() {
        let mut write = HashMap::new();
        write.insert("id".to_string(), json!(99));
        write.insert("title".to_string(), json!("t"));
        let q = update_by_pk(&service_table(), &json!(5), &write);
        assert!(!q.sql.contains("\"id\" = $1"));
        assert!(q.sql.contains("SET \"title\" = $1"));
    }

    #[test]
    fn empty_update_degenerates_to_select() {
        let q = update_by_pk(&service_table(), &json!(5), &HashMap::new());
        assert!(q.sql.starts_with("SELECT"));
        assert!(q.sql.contains("WHERE \"id\" = $1"));
        assert_eq!(q.params, vec![json!(5)]);
    }

    #[test]
    fn delete_returns_the_removed_row() {
        let q = delete_by_pk(&service_table());
        assert!(q.sql.starts_with("DELETE FROM \"public\".\"marketplace_service\" WHERE \"id\" = $1 RETURNING"));
        assert!(q.params.is_empty());
    }

    #[test]
    fn uuid_pk_placeholder_is_cast() {
        let mut t = service_table();
        t.pk_column = "id".into();
        t.columns[0] = col("id", "uuid", Some("uuid"));
        t.columns[0].primary_key = true;
        let q = select_by_pk(&t);
        assert!(q.sql.contains("WHERE \"id\" = $1::uuid"));
    }
}
