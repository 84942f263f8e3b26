use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, TransactionTrait};
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::ServiceError;
use crate::guest::domain::Guest;
use crate::guest::repository::GuestRepository;

/// Table-backed guest repository.
///
/// Inserts run check-then-insert inside one transaction behind an in-process
/// gate, so a single server never stores two rows with the same key.
pub struct SeaOrmGuestRepository {
    pub db: DatabaseConnection,
    insert_gate: Mutex<()>,
}

impl SeaOrmGuestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, insert_gate: Mutex::new(()) }
    }
}

#[async_trait::async_trait]
impl GuestRepository for SeaOrmGuestRepository {
    async fn find_by_name_ci(&self, name: &str) -> Result<Option<Guest>, ServiceError> {
        let res = models::guest::find_by_name(&self.db, name).await?;
        Ok(res.map(Guest::from))
    }

    async fn insert(&self, name: &str) -> Result<Guest, ServiceError> {
        let _gate = self.insert_gate.lock().await;
        let txn = self.db.begin().await.map_err(ServiceError::store)?;
        if models::guest::find_by_name(&txn, name).await?.is_some() {
            debug!(name = %name.trim(), "insert raced with an existing row");
            txn.rollback().await.map_err(ServiceError::store)?;
            return Err(ServiceError::Conflict(name.trim().to_string()));
        }
        let created = models::guest::create(&txn, name).await?;
        txn.commit().await.map_err(ServiceError::store)?;
        Ok(created.into())
    }

    async fn list_all(&self) -> Result<Vec<Guest>, ServiceError> {
        let rows = models::guest::list_ordered(&self.db).await?;
        Ok(rows.into_iter().map(Guest::from).collect())
    }

    async fn delete_by_name(&self, name: &str) -> Result<Option<Guest>, ServiceError> {
        let res = models::guest::delete_by_name(&self.db, name).await?;
        Ok(res.map(Guest::from))
    }

    async fn update_name(&self, old_name: &str, new_name: &str) -> Result<Option<Guest>, ServiceError> {
        let res = models::guest::rename(&self.db, old_name, new_name).await?;
        Ok(res.map(Guest::from))
    }

    async fn clear_all(&self) -> Result<(), ServiceError> {
        let removed = models::guest::clear(&self.db).await?;
        debug!(removed, "guest table cleared");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        match self.db.get_database_backend() {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::Sqlite => "sqlite",
            _ => "sql",
        }
    }
}
