//! # HTTP Server Module
//!
//! Axum front end for the intake service.
//!
//! # Endpoints
//!
//! - `/` - Liveness message (any method)
//! - `/healthz` - Health check with store status
//! - `/api/applications` - Submit an application (POST)

pub mod application_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
mod request_log;
pub mod server;
pub mod state;

pub use config::{ConfigError, HttpServerConfig};
pub use errors::{ApiError, ApiResult};
pub use server::{connect_store, HttpServer};
pub use state::AppState;
