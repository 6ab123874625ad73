//! Write-set construction: alias resolution, column filtering, and the
//! required-column completeness check.

use crate::entity::Entity;
use crate::error::ApiError;
use crate::schema::TableSchema;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Alias table for one request: incoming field name -> actual column name.
pub type AliasMap = HashMap<String, String>;

/// Build the alias table for this entity against the reflected columns. An
/// entry is added only when the incoming name is not itself a column and one
/// of its candidates is.
pub fn alias_map_for(entity: Entity, table: &TableSchema) -> AliasMap {
    let mut map = AliasMap::new();
    for (field, candidates) in entity.field_aliases() {
        if table.has_column(field) {
            continue;
        }
        if let Some(col) = candidates.iter().find(|c| table.has_column(c)) {
            map.insert((*field).to_string(), (*col).to_string());
        }
    }
    map
}

/// Keep only payload fields that, after alias resolution, name real columns.
/// An aliased field overrides a directly supplied target column.
pub fn resolve_columns(
    table: &TableSchema,
    payload: &Map<String, Value>,
    aliases: &AliasMap,
) -> HashMap<String, Value> {
    let mut write = HashMap::new();
    for (field, value) in payload {
        if aliases.contains_key(field) {
            continue;
        }
        if table.has_column(field) {
            write.insert(field.clone(), value.clone());
        }
    }
    for (field, target) in aliases {
        if let Some(value) = payload.get(field) {
            write.insert(target.clone(), value.clone());
        }
    }
    write
}

/// Column filtering plus the completeness check for inserts: every
/// non-nullable column without a default that is neither the primary key nor
/// autoincrementing must have a supplied value. A supplied null counts as a
/// value; it is left to the database's own constraints.
pub fn reconcile(
    entity: Entity,
    table: &TableSchema,
    payload: &Map<String, Value>,
    aliases: &AliasMap,
) -> Result<HashMap<String, Value>, ApiError> {
    let write = resolve_columns(table, payload, aliases);
    let missing: Vec<String> = table
        .columns
        .iter()
        .filter(|c| !c.primary_key && !c.has_default && !c.autoincrement && !c.nullable)
        .filter(|c| !write.contains_key(&c.name))
        .map(|c| c.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::MissingColumns {
            entity: entity.label(),
            columns: missing,
        });
    }
    Ok(write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMeta, PkType};
    use serde_json::json;

    fn col(name: &str, nullable: bool) -> ColumnMeta {
        ColumnMeta {
            name: name.to_string(),
            nullable,
            has_default: false,
            primary_key: false,
            autoincrement: false,
            data_type: "text".into(),
            pg_type: None,
        }
    }

    fn pk() -> ColumnMeta {
        ColumnMeta {
            name: "id".into(),
            nullable: false,
            has_default: true,
            primary_key: true,
            autoincrement: true,
            data_type: "integer".into(),
            pg_type: None,
        }
    }

    fn table(columns: Vec<ColumnMeta>) -> TableSchema {
        TableSchema {
            schema_name: "public".into(),
            table_name: "blog_post".into(),
            pk_column: "id".into(),
            pk_type: PkType::Int,
            columns,
        }
    }

    fn payload(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn content_aliases_to_body_when_content_is_not_a_column() {
        let t = table(vec![pk(), col("title", true), col("body", true)]);
        let aliases = alias_map_for(Entity::Post, &t);
        assert_eq!(aliases.get("content").map(String::as_str), Some("body"));

        let p = payload(json!({ "title": "T", "content": "hello" }));
        let write = resolve_columns(&t, &p, &aliases);
        assert_eq!(write.get("body"), Some(&json!("hello")));
        assert!(!write.contains_key("content"));
    }

    #[test]
    fn no_alias_when_content_is_a_real_column() {
        let t = table(vec![pk(), col("content", true), col("body", true)]);
        let aliases = alias_map_for(Entity::Post, &t);
        assert!(aliases.is_empty());
    }

    #[test]
    fn alias_candidates_are_tried_in_order() {
        let t = table(vec![pk(), col("text", true)]);
        let aliases = alias_map_for(Entity::Post, &t);
        assert_eq!(aliases.get("content").map(String::as_str), Some("text"));

        let t = table(vec![pk(), col("body", true), col("text", true)]);
        let aliases = alias_map_for(Entity::Post, &t);
        assert_eq!(aliases.get("content").map(String::as_str), Some("body"));
    }

    #[test]
    fn author_id_aliases_to_user_id() {
        let t = table(vec![pk(), col("user_id", true)]);
        let aliases = alias_map_for(Entity::Post, &t);
        assert_eq!(aliases.get("author_id").map(String::as_str), Some("user_id"));
    }

    #[test]
    fn aliased_field_overrides_direct_target_column() {
        let t = table(vec![pk(), col("body", true)]);
        let aliases = alias_map_for(Entity::Post, &t);
        let p = payload(json!({ "body": "direct", "content": "aliased" }));
        let write = resolve_columns(&t, &p, &aliases);
        assert_eq!(write.get("body"), Some(&json!("aliased")));
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let t = table(vec![pk(), col("title", true)]);
        let p = payload(json!({ "title": "T", "unknown": 1, "another": "x" }));
        let write = resolve_columns(&t, &p, &AliasMap::new());
        assert_eq!(write.len(), 1);
        assert!(write.contains_key("title"));
    }

    #[test]
    fn entities_without_policies_get_empty_alias_maps() {
        let t = table(vec![pk(), col("name", true)]);
        assert!(alias_map_for(Entity::Category, &t).is_empty());
        assert!(alias_map_for(Entity::Booking, &t).is_empty());
    }

    #[test]
    fn missing_required_columns_are_all_named() {
        let t = table(vec![
            pk(),
            col("customer_name", false),
            col("service_id", false),
            col("notes", true),
        ]);
        let p = payload(json!({ "notes": "n" }));
        let err = reconcile(Entity::Booking, &t, &p, &AliasMap::new()).expect_err("incomplete");
        match err {
            ApiError::MissingColumns { entity, columns } => {
                assert_eq!(entity, "Booking");
                assert_eq!(columns, vec!["customer_name".to_string(), "service_id".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn supplied_null_counts_as_a_value() {
        let t = table(vec![pk(), col("customer_name", false)]);
        let p = payload(json!({ "customer_name": null }));
        let write = reconcile(Entity::Booking, &t, &p, &AliasMap::new()).expect("null supplied");
        assert_eq!(write.get("customer_name"), Some(&Value::Null));
    }

    #[test]
    fn defaulted_and_autoincrement_columns_are_not_required() {
        let mut created = col("created_at", false);
        created.has_default = true;
        let mut seq = col("position", false);
        seq.autoincrement = true;
        let t = table(vec![pk(), created, seq, col("title", false)]);
        let p = payload(json!({ "title": "T" }));
        let write = reconcile(Entity::Post, &t, &p, &AliasMap::new()).expect("complete");
        assert_eq!(write.len(), 1);
    }

    #[test]
    fn resolved_aliases_satisfy_the_required_check() {
        let t = table(vec![pk(), col("body", false), col("title", false)]);
        let aliases = alias_map_for(Entity::Post, &t);
        let p = payload(json!({ "title": "T", "content": "hello" }));
        let write = reconcile(Entity::Post, &t, &p, &aliases).expect("body satisfied via alias");
        assert_eq!(write.get("body"), Some(&json!("hello")));
    }
}
