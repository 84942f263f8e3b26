use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use axum::extract::State;
use common::types::Health;

use crate::metrics::encode_metrics;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod admin;
pub mod guests;

#[utoipa::path(get, path = "/api/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health::ok(state.environment.clone(), Some(state.guests.backend().to_string())))
}

async fn metrics() -> (axum::http::StatusCode, String) {
    encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/confirm-presence", post(guests::confirm_presence))
        .route("/api/guests", get(guests::list_guests))
        .route("/api/health", get(health))
        .route("/api/admin/manage", post(admin::manage));

    let ops = Router::new()
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    api.merge(ops)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
