use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static GUESTS_CONFIRMED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rsvp_guests_confirmed_total",
        "Total confirmations stored"
    )
    .expect("register guests_confirmed_total")
});

pub static CONFIRMATIONS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rsvp_confirmations_rejected_total",
        "Total confirmations refused for a blank or duplicate name"
    )
    .expect("register confirmations_rejected_total")
});

pub static ADMIN_ACTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "rsvp_admin_actions_total",
        "Admin maintenance actions by action and outcome",
        &["action", "outcome"]
    )
    .expect("register admin_actions_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rsvp_store_errors_total",
        "Total guest store failures"
    )
    .expect("register store_errors_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
