//! Reflected database schema: column metadata captured once at startup.

mod catalog;
mod reflect;

pub use catalog::Catalog;

/// Primary key type for parsing path ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PkType {
    Uuid,
    BigInt,
    Int,
    Text,
}

#[derive(Clone, Debug)]
pub struct ColumnMeta {
    pub name: String,
    pub nullable: bool,
    /// Whether the column has a database-side default (including sequences).
    pub has_default: bool,
    pub primary_key: bool,
    /// Identity column or a nextval() default.
    pub autoincrement: bool,
    /// Raw data_type from information_schema, e.g. "timestamp with time zone".
    pub data_type: String,
    /// PostgreSQL type name for SQL casts (e.g. "timestamptz") when binding
    /// string values.
    pub pg_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TableSchema {
    pub schema_name: String,
    pub table_name: String,
    pub pk_column: String,
    pub pk_type: PkType,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnMeta>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}
