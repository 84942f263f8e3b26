use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("store error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn store(e: impl std::fmt::Display) -> Self { Self::Db(e.to_string()) }

    /// True for failures the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Conflict(_))
            || matches!(self, Self::Model(models::errors::ModelError::Validation(_)))
    }
}
