//! Immutable snapshot of the reflected schema, shared across requests.

use crate::entity::Entity;
use crate::error::SchemaError;
use crate::schema::reflect::reflect_table;
use crate::schema::TableSchema;
use sqlx::PgPool;

/// Per-entity table metadata, built once at startup. Handlers receive it
/// through shared state and never mutate it.
#[derive(Clone, Debug)]
pub struct Catalog {
    /// Indexed by `Entity` declaration order; construction covers every entity.
    tables: Vec<TableSchema>,
}

impl Catalog {
    /// Reflect every known entity's table. Any table missing from the
    /// database is fatal; there is no partial-degradation mode.
    pub async fn reflect(pool: &PgPool, db_schema: &str) -> Result<Catalog, SchemaError> {
        let mut tables = Vec::with_capacity(Entity::ALL.len());
        for entity in Entity::ALL {
            let table = reflect_table(pool, db_schema, entity).await?;
            tracing::info!(table = %table.table_name, columns = table.columns.len(), "reflected");
            tables.push(table);
        }
        Ok(Catalog { tables })
    }

    /// Build a catalog from already-known table schemas. Every entity must be
    /// covered.
    pub fn from_tables(mut entries: Vec<(Entity, TableSchema)>) -> Result<Catalog, SchemaError> {
        let mut tables = Vec::with_capacity(Entity::ALL.len());
        for entity in Entity::ALL {
            let pos = entries
                .iter()
                .position(|(e, _)| *e == entity)
                .ok_or_else(|| SchemaError::TableMissing {
                    table: entity.table().to_string(),
                })?;
            tables.push(entries.swap_remove(pos).1);
        }
        Ok(Catalog { tables })
    }

    pub fn describe(&self, entity: Entity) -> &TableSchema {
        &self.tables[entity.index()]
    }

    /// Known table names, in entity declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table_name.as_str()).collect()
    }
}
