use sea_orm::DbErr;
use thiserror::Error;

/// Failures from the row-level guest helpers.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid guest: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self { Self::Db(e.to_string()) }
}
