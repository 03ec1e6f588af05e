//! Admin HTTP endpoints served next to the consumer loop.
//!
//! - `GET /__health` full report, always 200
//! - `GET /__gtg` 200 `OK` or 503 with the first failing diagnostic
//! - `GET /__ping`
//! - `GET /__build-info`

mod handlers;
mod server;

pub use server::{build_app, run_gateway_with_listener};

use crate::diagnostics::health::HealthService;
use std::sync::Arc;

/// Request timeout (30s). Health probes are bounded separately and finish first.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub health: Arc<HealthService>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(health: Arc<HealthService>, service_name: &str) -> Self {
        Self {
            health,
            service_name: Arc::from(service_name),
        }
    }
}
