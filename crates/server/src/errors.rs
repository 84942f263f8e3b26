use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::error;

use crate::metrics;

pub const CONFLICT_MESSAGE: &str = "Este nome já foi confirmado";
pub const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

/// Failure body shared by every endpoint: `{success: false, message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Map a service failure; store failures get `internal_message` and are logged, never echoed.
    pub fn from_service(e: ServiceError, internal_message: &str) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::Model(models::errors::ModelError::Validation(_)) => {
                Self::new(StatusCode::BAD_REQUEST, service::guest::service::NAME_REQUIRED)
            }
            ServiceError::Conflict(_) => Self::new(StatusCode::CONFLICT, CONFLICT_MESSAGE),
            other => {
                metrics::STORE_ERRORS_TOTAL.inc();
                error!(error = %other, "guest store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, internal_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"success": false, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}
