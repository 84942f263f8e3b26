use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, StorageBackend};
use migration::MigratorTrait;
use service::{
    file::guest_store::JsonGuestStore,
    guest::{repo::seaorm::SeaOrmGuestRepository, GuestRepository},
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Open the configured backing. The database variant runs pending migrations first.
pub async fn build_repository(cfg: &AppConfig) -> anyhow::Result<Arc<dyn GuestRepository>> {
    match cfg.storage.backend {
        StorageBackend::File => {
            common::env::ensure_data_dir(&cfg.storage.file_path).await?;
            let store = JsonGuestStore::open(&cfg.storage.file_path).await?;
            info!(file = %store.path().display(), "using json file store");
            Ok(Arc::new(store))
        }
        StorageBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database).await?;
            migration::Migrator::up(&db, None).await?;
            info!("using database store");
            Ok(Arc::new(SeaOrmGuestRepository::new(db)))
        }
    }
}

/// Router wired to a given repository, with the standard CORS and tracing layers.
pub fn build_app(repo: Arc<dyn GuestRepository>, environment: Option<String>) -> Router {
    let state = AppState::new(repo, environment);
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Build the app from an already validated configuration and serve until Ctrl+C.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let repo = build_repository(&cfg).await?;
    let app = build_app(repo, cfg.app.environment.clone());

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend = ?cfg.storage.backend, "server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_backend_creates_data_file() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("rsvp_startup_{}", std::process::id()));
        let file = dir.join("data").join("guests.json");
        let mut cfg = AppConfig::default();
        cfg.storage.file_path = file.to_string_lossy().into_owned();

        let repo = build_repository(&cfg).await?;
        assert_eq!(repo.backend(), "json-file");
        assert!(tokio::fs::metadata(&file).await.is_ok());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 3100;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 3100);
    }
}
