use super::handlers::{handle_build_info, handle_gtg, handle_health, handle_ping};
use super::{AppState, REQUEST_TIMEOUT_SECS};

use anyhow::{Context, Result};
use axum::{Router, http::StatusCode, routing::get};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;

/// Serve from a pre-bound listener. In-flight requests finish before this returns.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    let local = listener
        .local_addr()
        .context("get gateway listener local address")?;
    tracing::info!(address = %local, "admin endpoints listening");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("serve admin endpoints")?;

    tracing::info!("admin endpoints stopped");
    Ok(())
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/__health", get(handle_health))
        .route("/__gtg", get(handle_gtg))
        .route("/__ping", get(handle_ping))
        .route("/__build-info", get(handle_build_info))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}
