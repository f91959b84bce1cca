//! # HTTP Server
//!
//! Composition root: builds the router, binds the listener, then connects
//! the store in the background so health checks answer while it opens.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::application_routes::application_routes;
use super::config::{parse_origin, HttpServerConfig};
use super::health_routes::health_routes;
use super::request_log::log_request;
use super::state::AppState;
use crate::observability::Logger;
use crate::store::{ApplicationStore, StoreHandle};

/// HTTP server for the intake API
pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<AppState>,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpServerConfig::default())
    }

    /// Create a server whose store is not connected yet
    pub fn with_config(config: HttpServerConfig) -> Self {
        Self::with_state(config, Arc::new(AppState::default()))
    }

    /// Create a server around existing state
    pub fn with_state(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = build_router(&config, state.clone());
        Self {
            config,
            state,
            router,
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn store(&self) -> &StoreHandle {
        &self.state.store
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C.
    ///
    /// The store is connected after the listener is bound; a failed connect
    /// is logged and leaves the server up with the store disconnected.
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid listen address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?.to_string();
        Logger::info("SERVER_LISTENING", &[("addr", &local)]);

        if !self.state.store.is_connected() {
            tokio::spawn(connect_store(
                self.state.store.clone(),
                self.config.database_url.clone(),
            ));
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::info("SERVER_SHUTDOWN", &[]);
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the combined router
fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let mut origins = Vec::with_capacity(config.cors_origins.len());
        for origin in &config.cors_origins {
            match parse_origin(origin) {
                Ok(value) => origins.push(value),
                Err(e) => Logger::warn("CORS_ORIGIN_IGNORED", &[("error", &e.to_string())]),
            }
        }

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(health_routes(state.clone()))
        .nest("/api", application_routes(state))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
}

/// Opens the store at `url` and installs it into `handle`.
///
/// Returns whether the handle ended up connected.
pub async fn connect_store(handle: StoreHandle, url: String) -> bool {
    Logger::info("STORE_CONNECTING", &[("url", &url)]);

    let opened = {
        let url = url.clone();
        tokio::task::spawn_blocking(move || ApplicationStore::connect(&url)).await
    };

    match opened {
        Ok(Ok(store)) => {
            let location = store.describe().unwrap_or_default();
            let records = store.len().map(|n| n.to_string()).unwrap_or_default();
            handle.install(store);
            Logger::info(
                "STORE_CONNECTED",
                &[("location", &location), ("records", &records)],
            );
        }
        Ok(Err(e)) if e.is_fatal() => {
            Logger::fatal(
                "STORE_CONNECT_FAILED",
                &[("url", &url), ("error", &e.to_string())],
            );
        }
        Ok(Err(e)) => {
            Logger::error(
                "STORE_CONNECT_FAILED",
                &[("url", &url), ("error", &e.to_string())],
            );
        }
        Err(e) => {
            Logger::error(
                "STORE_CONNECT_FAILED",
                &[("url", &url), ("error", &e.to_string())],
            );
        }
    }

    handle.is_connected()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        Logger::error("SIGNAL_HANDLER_FAILED", &[("error", &e.to_string())]);
        // Without a signal handler, serve until the process is killed.
        std::future::pending::<()>().await;
    }
}
