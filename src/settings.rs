//! Process settings read from the environment, with local-dev fallbacks.

/// Runtime settings. `from_env` never fails; every knob has a default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    /// Postgres schema the entity tables live in.
    pub db_schema: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/kiri_ng".into()),
            bind_addr: std::env::var("KIRI_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into()),
            db_schema: std::env::var("KIRI_DB_SCHEMA").unwrap_or_else(|_| "public".into()),
            max_connections: std::env::var("KIRI_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
