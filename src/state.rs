//! Shared application state for all routes.

use crate::schema::Catalog;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// Reflected once at startup; immutable for the process lifetime.
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(pool: PgPool, catalog: Catalog) -> Self {
        Self {
            pool,
            catalog: Arc::new(catalog),
        }
    }
}
