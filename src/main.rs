//! Kiri API server: reflects the entity tables, then serves the REST routes.

use kiri_api::{router, AppState, Catalog, Settings};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("kiri_api=info".parse()?))
        .init();

    let settings = Settings::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    let catalog = match Catalog::reflect(&pool, &settings.db_schema).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "schema reflection failed; refusing to start");
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, catalog);
    let app = router(state);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
