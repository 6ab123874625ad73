//! Reflect table metadata from information_schema.

use crate::entity::Entity;
use crate::error::SchemaError;
use crate::schema::{ColumnMeta, PkType, TableSchema};
use sqlx::{PgPool, Row};

// Catalog columns come back cast to text; information_schema exposes them as
// domains over "name", which sqlx will not decode as String directly.
const COLUMNS_SQL: &str = "SELECT c.column_name::text AS column_name, \
            c.is_nullable::text AS is_nullable, \
            c.column_default::text AS column_default, \
            c.is_identity::text AS is_identity, \
            c.data_type::text AS data_type \
     FROM information_schema.columns c \
     WHERE c.table_schema = $1 AND c.table_name = $2 \
     ORDER BY c.ordinal_position";

const PK_SQL: &str = "SELECT kcu.column_name::text \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON kcu.constraint_name = tc.constraint_name \
      AND kcu.table_schema = tc.table_schema \
      AND kcu.table_name = tc.table_name \
     WHERE tc.table_schema = $1 AND tc.table_name = $2 \
       AND tc.constraint_type = 'PRIMARY KEY' \
     ORDER BY kcu.ordinal_position";

pub(crate) async fn reflect_table(
    pool: &PgPool,
    db_schema: &str,
    entity: Entity,
) -> Result<TableSchema, SchemaError> {
    let table = entity.table();
    tracing::debug!(sql = %COLUMNS_SQL, table = %table, "reflect");
    let rows = sqlx::query(COLUMNS_SQL)
        .bind(db_schema)
        .bind(table)
        .fetch_all(pool)
        .await?;
    if rows.is_empty() {
        return Err(SchemaError::TableMissing {
            table: table.to_string(),
        });
    }

    let pk_names: Vec<String> = sqlx::query_scalar(PK_SQL)
        .bind(db_schema)
        .bind(table)
        .fetch_all(pool)
        .await?;
    let pk_column = pk_names
        .first()
        .cloned()
        .ok_or_else(|| SchemaError::NoPrimaryKey {
            table: table.to_string(),
        })?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let name: String = row.try_get("column_name")?;
        let is_nullable: String = row.try_get("is_nullable")?;
        let column_default: Option<String> = row.try_get("column_default")?;
        let is_identity: String = row.try_get("is_identity")?;
        let data_type: String = row.try_get("data_type")?;
        let autoincrement = is_identity == "YES"
            || column_default
                .as_deref()
                .map(|d| d.starts_with("nextval("))
                .unwrap_or(false);
        columns.push(ColumnMeta {
            name: name.clone(),
            nullable: is_nullable == "YES",
            has_default: column_default.is_some(),
            primary_key: pk_names.contains(&name),
            autoincrement,
            pg_type: cast_type_name(&data_type),
            data_type,
        });
    }

    let pk_type = columns
        .iter()
        .find(|c| c.name == pk_column)
        .map(|c| infer_pk_type(&c.data_type))
        .unwrap_or(PkType::Text);

    Ok(TableSchema {
        schema_name: db_schema.to_string(),
        table_name: table.to_string(),
        pk_column,
        pk_type,
        columns,
    })
}

/// Type name for a bind cast when string parameters target a typed column.
fn cast_type_name(data_type: &str) -> Option<String> {
    let lower = data_type.to_lowercase();
    if lower == "timestamp with time zone" {
        Some("timestamptz".into())
    } else if lower.starts_with("timestamp") {
        Some("timestamp".into())
    } else if lower == "date" {
        Some("date".into())
    } else if lower == "uuid" {
        Some("uuid".into())
    } else {
        None
    }
}

fn infer_pk_type(data_type: &str) -> PkType {
    let lower = data_type.to_lowercase();
    if lower.contains("uuid") {
        PkType::Uuid
    } else if lower.contains("bigint") {
        PkType::BigInt
    } else if lower.contains("int") {
        PkType::Int
    } else {
        PkType::Text
    }
}
