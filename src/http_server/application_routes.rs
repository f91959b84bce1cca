//! Application intake routes
//!
//! `POST /api/applications`: validation, then store insert, then one of
//! 201 / 400 / 409 / 500.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};
use super::state::AppState;
use crate::observability::Logger;
use crate::store::StoreError;
use crate::validation::{validate_submission, Validation};

/// Body of a 201 response
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: String,
}

/// Create application routes
pub fn application_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/applications", post(create_application_handler))
        .with_state(state)
}

async fn create_application_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let input = parse_body(&body)?;

    let application = match validate_submission(&input) {
        Validation::Accepted(app) => app,
        Validation::Rejected(errors) => {
            Logger::info(
                "APPLICATION_REJECTED",
                &[("stage", "validation"), ("fields", &errors.field_list())],
            );
            return Err(ApiError::Validation(errors));
        }
    };

    let store = state.store.get().map_err(insert_failure)?;

    let id = tokio::task::spawn_blocking(move || store.insert_application(&application))
        .await
        .map_err(|e| {
            Logger::error("APPLICATION_INSERT_FAILED", &[("error", &e.to_string())]);
            ApiError::Internal(e.to_string())
        })?
        .map_err(insert_failure)?;

    Logger::info("APPLICATION_ACCEPTED", &[("id", &id)]);

    Ok((StatusCode::CREATED, Json(CreatedResponse { ok: true, id })))
}

/// Parses the raw body. An empty body is an empty submission.
fn parse_body(body: &[u8]) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| {
        Logger::info(
            "APPLICATION_REJECTED",
            &[("stage", "parse"), ("error", &e.to_string())],
        );
        ApiError::MalformedBody(e.to_string())
    })
}

/// Logs a store failure at the right severity and converts it.
fn insert_failure(err: StoreError) -> ApiError {
    match &err {
        StoreError::DuplicateKey(_) => {
            let fields = err.field_errors().map(|e| e.field_list()).unwrap_or_default();
            Logger::info("APPLICATION_DUPLICATE", &[("fields", &fields)]);
        }
        StoreError::Validation(errors) => {
            Logger::info(
                "APPLICATION_REJECTED",
                &[("stage", "schema"), ("fields", &errors.field_list())],
            );
        }
        other => {
            Logger::error("APPLICATION_INSERT_FAILED", &[("error", &other.to_string())]);
        }
    }
    ApiError::from(err)
}
