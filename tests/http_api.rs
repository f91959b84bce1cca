//! HTTP contract tests
//!
//! Every request goes through the full router (CORS, access log, handlers)
//! with `tower::ServiceExt::oneshot`; no socket is opened.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use flux_induction::application::Field;
use flux_induction::http_server::{connect_store, AppState, HttpServer, HttpServerConfig};
use flux_induction::store::{ApplicationStore, DocumentLog, StoreHandle};
use flux_induction::storage::{DocumentRecord, StorageError, StorageResult, STORAGE_FILE};

fn router_with(handle: StoreHandle) -> Router {
    let state = Arc::new(AppState::new(handle));
    HttpServer::with_state(HttpServerConfig::default(), state).router()
}

fn connected_router() -> (Router, Arc<ApplicationStore>) {
    let handle = StoreHandle::connected(ApplicationStore::in_memory());
    let store = handle.get().unwrap();
    (router_with(handle), store)
}

fn valid_submission() -> Value {
    json!({
        "name": "A",
        "branch": "CS",
        "year": "2",
        "rollNo": "1234567890",
        "phone": "9876543210",
        "email": "a@b.com"
    })
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn submit(router: &Router, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/applications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test]
async fn test_valid_submission_created() {
    let (router, store) = connected_router();

    let (status, body) = submit(&router, &valid_submission()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    let id = body["id"].as_str().unwrap();

    let app = store.get(id).unwrap().unwrap();
    assert_eq!(app.roll_no.chars().count(), 10);
    assert_eq!(app.email, "a@b.com");
}

#[tokio::test]
async fn test_values_trimmed_and_email_lowercased() {
    let (router, store) = connected_router();
    let mut input = valid_submission();
    input["name"] = json!("  Ada Lovelace  ");
    input["email"] = json!("Ada@Example.COM");

    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::CREATED);
    let app = store.get(body["id"].as_str().unwrap()).unwrap().unwrap();
    assert_eq!(app.name, "Ada Lovelace");
    assert_eq!(app.email, "ada@example.com");
}

#[tokio::test]
async fn test_unknown_fields_not_stored() {
    let (router, store) = connected_router();
    let mut input = valid_submission();
    input["foo"] = json!("bar");

    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::CREATED);
    let app = store.get(body["id"].as_str().unwrap()).unwrap().unwrap();
    let stored = serde_json::to_value(&app).unwrap();
    assert!(stored.get("foo").is_none());
}

// =============================================================================
// VALIDATION (400)
// =============================================================================

#[tokio::test]
async fn test_short_roll_number_rejected_alone() {
    let (router, store) = connected_router();
    let mut input = valid_submission();
    input["rollNo"] = json!("123");

    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert_eq!(
        body["errors"],
        json!({ "rollNo": "Roll number must be exactly 10 characters" })
    );
    assert_eq!(store.len().unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let (router, _store) = connected_router();
    let mut input = valid_submission();
    input["email"] = json!("not-an-email");

    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!({ "email": "Please enter a valid email address" })
    );
}

#[tokio::test]
async fn test_empty_object_reports_every_field() {
    let (router, _store) = connected_router();

    let (status, body) = submit(&router, &json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 6);
    for field in Field::ALL {
        assert!(errors.contains_key(field.as_str()), "missing {field}");
    }
}

#[tokio::test]
async fn test_non_string_value_rejected() {
    let (router, _store) = connected_router();
    let mut input = valid_submission();
    input["year"] = json!(2);

    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!({ "year": "Year must be between 1 and 20 characters" })
    );
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let (router, store) = connected_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/applications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "ok": false, "errors": { "body": "Request body must be valid JSON" } })
    );
    assert_eq!(store.len().unwrap(), 0);
}

#[tokio::test]
async fn test_validation_runs_before_connection_check() {
    let router = router_with(StoreHandle::disconnected());

    let (status, _body) = submit(&router, &json!({ "rollNo": "1" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// UNIQUENESS (409)
// =============================================================================

#[tokio::test]
async fn test_repeated_submission_conflicts() {
    let (router, store) = connected_router();

    let (first, _) = submit(&router, &valid_submission()).await;
    let (second, body) = submit(&router, &valid_submission()).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["ok"], false);
    assert_eq!(
        body["errors"],
        json!({
            "rollNo": "rollNo already exists",
            "phone": "phone already exists",
            "email": "email already exists"
        })
    );
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_single_colliding_field_reported() {
    let (router, store) = connected_router();
    submit(&router, &valid_submission()).await;

    let mut input = valid_submission();
    input["rollNo"] = json!("0987654321");
    input["email"] = json!("other@b.com");

    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errors"], json!({ "phone": "phone already exists" }));
    assert_eq!(store.len().unwrap(), 1);
}

#[tokio::test]
async fn test_email_uniqueness_ignores_case() {
    let (router, _store) = connected_router();
    submit(&router, &valid_submission()).await;

    let input = json!({
        "name": "B",
        "branch": "EE",
        "year": "3",
        "rollNo": "0987654321",
        "phone": "1112223333",
        "email": "A@B.COM"
    });
    let (status, body) = submit(&router, &input).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errors"], json!({ "email": "email already exists" }));
}

#[tokio::test]
async fn test_concurrent_duplicates_store_once() {
    let (router, store) = connected_router();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let router = router.clone();
        tasks.push(tokio::spawn(async move {
            submit(&router, &valid_submission()).await.0
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => conflicts += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.len().unwrap(), 1);
}

/// Unique indexes come back from disk, so a restart does not reopen the
/// door to duplicates.
#[tokio::test]
async fn test_duplicate_after_restart_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("file:{}", dir.path().display());

    {
        let handle = StoreHandle::disconnected();
        assert!(connect_store(handle.clone(), url.clone()).await);
        let (status, _) = submit(&router_with(handle), &valid_submission()).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let handle = StoreHandle::disconnected();
    assert!(connect_store(handle.clone(), url).await);
    let router = router_with(handle.clone());

    let (status, body) = submit(&router, &valid_submission()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["errors"]["rollNo"], "rollNo already exists");
    assert_eq!(handle.get().unwrap().len().unwrap(), 1);
}

// =============================================================================
// UNEXPECTED FAILURES (500)
// =============================================================================

struct BrokenLog;

impl DocumentLog for BrokenLog {
    fn append(&mut self, _record: &DocumentRecord) -> StorageResult<u64> {
        Err(StorageError::write_failed_no_source(
            "/var/lib/flux/applications.dat: no space left on device",
        ))
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

#[tokio::test]
async fn test_write_failure_is_opaque() {
    let store = ApplicationStore::with_log(Box::new(BrokenLog), Vec::new()).unwrap();
    let handle = StoreHandle::connected(store);
    let store = handle.get().unwrap();
    let router = router_with(handle);

    let (status, body) = submit(&router, &valid_submission()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "ok": false, "error": "Internal server error" }));
    assert_eq!(store.len().unwrap(), 0);
    assert!(store.find_by(Field::RollNo, "1234567890").unwrap().is_none());
}

#[tokio::test]
async fn test_valid_submission_without_store_is_internal_error() {
    let router = router_with(StoreHandle::disconnected());

    let (status, body) = submit(&router, &valid_submission()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

// =============================================================================
// HEALTH AND ROOT
// =============================================================================

#[tokio::test]
async fn test_healthz_tracks_connection() {
    let handle = StoreHandle::disconnected();
    let router = router_with(handle.clone());

    let (status, body) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "disconnected");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);

    assert!(connect_store(handle, "memory:".to_string()).await);

    let (_, body) = get(&router, "/healthz").await;
    assert_eq!(body["db"], "connected");
}

#[tokio::test]
async fn test_failed_connect_keeps_serving() {
    let handle = StoreHandle::disconnected();
    let router = router_with(handle.clone());

    assert!(!connect_store(handle, "mysql://db/flux".to_string()).await);

    let (status, body) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["db"], "disconnected");

    let (status, _) = get(&router, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_corrupted_store_keeps_serving_health() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(STORAGE_FILE), b"not a record file at all").unwrap();

    let handle = StoreHandle::disconnected();
    let router = router_with(handle.clone());

    assert!(!connect_store(handle, format!("file:{}", dir.path().display())).await);

    let (status, body) = get(&router, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["db"], "disconnected");
}

#[tokio::test]
async fn test_root_answers_any_method() {
    let router = router_with(StoreHandle::disconnected());

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
        let request = Request::builder()
            .method(method.clone())
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK, "{method}");
        assert_eq!(
            body,
            json!({ "status": "ok", "message": "FLUX Dbms backend is running" })
        );
    }
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let router = router_with(StoreHandle::disconnected());

    let (status, _) = get(&router, "/api/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let router = router_with(StoreHandle::disconnected());
    let request = Request::builder()
        .uri("/healthz")
        .header(header::ORIGIN, "https://induction.example")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
