//! Health HTTP Routes
//!
//! Health checks used by the hosting platform. Both work whether or not the store
//! is connected.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;

use super::state::AppState;

/// Message returned from the root route.
pub const ROOT_MESSAGE: &str = "FLUX Dbms backend is running";

/// Store connectivity as reported by `/healthz`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbStatus {
    Connected,
    Disconnected,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub db: DbStatus,
    /// Seconds since startup
    pub uptime: f64,
}

/// Root response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Create health routes: `/` (any method) and `GET /healthz`
pub fn health_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(root_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        message: ROOT_MESSAGE,
    })
}

async fn healthz_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let db = if state.store.is_connected() {
        DbStatus::Connected
    } else {
        DbStatus::Disconnected
    };

    Json(HealthResponse {
        status: "ok",
        db,
        uptime: state.uptime_secs(),
    })
}
