use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

/// GET /__health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.health.report().await)
}

/// GET /__gtg
pub(super) async fn handle_gtg(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.health.gtg().await;
    if status.good_to_go {
        return (StatusCode::OK, "OK".to_string());
    }
    (
        StatusCode::SERVICE_UNAVAILABLE,
        status.message.unwrap_or_default(),
    )
}

/// GET /__ping
pub(super) async fn handle_ping() -> &'static str {
    "pong"
}

/// GET /__build-info
pub(super) async fn handle_build_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.service_name.as_ref(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
