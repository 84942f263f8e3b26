use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use service::guest::domain::{ManageOutcome, ManageRequest};
use tracing::{debug, info};

use crate::errors::{ApiError, INTERNAL_MESSAGE};
use crate::metrics;
use crate::state::AppState;

pub const NOT_FOUND_MESSAGE: &str = "Convidado não encontrado";
pub const CLEARED_MESSAGE: &str = "Lista de convidados limpa";
pub const UNRECOGNIZED_MESSAGE: &str = "Ação não reconhecida. Use: delete, edit, ou clear";

fn outcome_label(outcome: &ManageOutcome) -> &'static str {
    match outcome {
        ManageOutcome::Removed(_) | ManageOutcome::Updated { .. } | ManageOutcome::Cleared => "applied",
        ManageOutcome::NotFound => "not_found",
        ManageOutcome::Unrecognized => "unrecognized",
    }
}

/// Multiplexed maintenance endpoint: `delete`, `edit` or `clear`.
#[utoipa::path(
    post,
    path = "/api/admin/manage",
    tag = "admin",
    request_body = crate::openapi::ManageRequestDoc,
    responses(
        (status = 200, description = "Action result; `success` is false for unknown guests or actions"),
        (status = 400, description = "Name or new name missing"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn manage(
    State(state): State<AppState>,
    body: Result<Json<ManageRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!(error = %rejection, "manage body rejected");
            ManageRequest::default()
        }
    };
    info!(action = ?req.action, name = ?req.name, new_name = ?req.new_name, "admin manage requested");
    let action = req.action.clone().unwrap_or_default();

    let outcome = state
        .guests
        .manage(req)
        .await
        .map_err(|e| ApiError::from_service(e, INTERNAL_MESSAGE))?;
    let label = if outcome == ManageOutcome::Unrecognized { "unknown" } else { action.as_str() };
    metrics::ADMIN_ACTIONS_TOTAL.with_label_values(&[label, outcome_label(&outcome)]).inc();

    let body = match outcome {
        ManageOutcome::Removed(removed) => json!({
            "success": true,
            "message": format!("Convidado \"{}\" removido", removed.name),
            "removed": removed,
        }),
        ManageOutcome::Updated { previous, guest } => json!({
            "success": true,
            "message": format!("Nome alterado de \"{}\" para \"{}\"", previous, guest.name),
            "updated": guest,
        }),
        ManageOutcome::Cleared => json!({
            "success": true,
            "message": CLEARED_MESSAGE,
            "total": 0,
        }),
        ManageOutcome::NotFound => json!({"success": false, "message": NOT_FOUND_MESSAGE}),
        ManageOutcome::Unrecognized => json!({"success": false, "message": UNRECOGNIZED_MESSAGE}),
    };
    Ok(Json(body))
}
