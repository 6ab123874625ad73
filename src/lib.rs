//! Kiri API: REST backend over externally owned Postgres tables.
//!
//! Table shapes are reflected from `information_schema` at startup and held
//! immutable for the process lifetime. Handlers are generic over a fixed set
//! of entities; payload shapes, field aliases, and response projections are
//! static per-entity data.

pub mod entity;
pub mod error;
pub mod openapi;
pub mod payload;
pub mod project;
pub mod reconcile;
pub mod routes;
pub mod schema;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;

pub mod handlers;

pub use entity::Entity;
pub use error::{ApiError, SchemaError};
pub use openapi::ApiDoc;
pub use routes::router;
pub use schema::{Catalog, ColumnMeta, PkType, TableSchema};
pub use service::CrudService;
pub use settings::Settings;
pub use state::AppState;
