//! Access log middleware
//!
//! One `HTTP_REQUEST` line per request: method, path, status, latency.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::observability::Logger;

pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let latency_ms = format!("{:.3}", started.elapsed().as_secs_f64() * 1000.0);
    Logger::info(
        "HTTP_REQUEST",
        &[
            ("method", &method),
            ("path", &path),
            ("status", response.status().as_str()),
            ("latency_ms", &latency_ms),
        ],
    );

    response
}
