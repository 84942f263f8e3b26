use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

/// Open a pooled connection using the configured limits and timeouts.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    info!(max = cfg.max_connections, min = cfg.min_connections, "database pool ready");
    Ok(db)
}

/// Single-connection in-memory SQLite database, used by tests and local runs.
pub async fn connect_memory() -> anyhow::Result<DatabaseConnection> {
    let mut cfg = DatabaseConfig::with_url("sqlite::memory:");
    cfg.max_connections = 1;
    cfg.min_connections = 1;
    connect_with_config(&cfg).await
}
