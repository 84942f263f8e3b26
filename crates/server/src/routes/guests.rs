use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service::guest::domain::Guest;
use tracing::debug;

use crate::errors::ApiError;
use crate::metrics;
use crate::state::AppState;

pub const CONFIRMED_MESSAGE: &str = "Presença confirmada com sucesso!";
pub const CONFIRM_FAILED_MESSAGE: &str = "Erro ao salvar confirmação";
pub const LIST_FAILED_MESSAGE: &str = "Erro ao buscar convidados";

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub success: bool,
    pub message: &'static str,
    pub guest: Guest,
}

#[derive(Debug, Serialize)]
pub struct GuestListResponse {
    pub success: bool,
    pub guests: Vec<Guest>,
    pub total: usize,
}

#[utoipa::path(
    post,
    path = "/api/confirm-presence",
    tag = "guests",
    request_body = crate::openapi::ConfirmRequestDoc,
    responses(
        (status = 200, description = "Confirmed"),
        (status = 400, description = "Name missing"),
        (status = 409, description = "Name already confirmed"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn confirm_presence(
    State(state): State<AppState>,
    body: Result<Json<ConfirmRequest>, JsonRejection>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    // An unreadable body is treated like a missing name.
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => {
            debug!(error = %rejection, "confirm body rejected");
            ConfirmRequest::default()
        }
    };

    match state.guests.confirm(input.name.as_deref()).await {
        Ok(guest) => {
            metrics::GUESTS_CONFIRMED_TOTAL.inc();
            Ok(Json(ConfirmResponse { success: true, message: CONFIRMED_MESSAGE, guest }))
        }
        Err(e) => {
            if e.is_client_error() {
                metrics::CONFIRMATIONS_REJECTED_TOTAL.inc();
            }
            Err(ApiError::from_service(e, CONFIRM_FAILED_MESSAGE))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/guests",
    tag = "guests",
    responses(
        (status = 200, description = "Guests ordered by name", body = [crate::openapi::GuestDoc]),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_guests(State(state): State<AppState>) -> Result<Json<GuestListResponse>, ApiError> {
    let guests = state
        .guests
        .list()
        .await
        .map_err(|e| ApiError::from_service(e, LIST_FAILED_MESSAGE))?;
    let total = guests.len();
    Ok(Json(GuestListResponse { success: true, guests, total }))
}
