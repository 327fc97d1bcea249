//! Shared harness for the HTTP integration tests.
//!
//! Every test gets its own in-memory SQLite database with migrations
//! applied, wrapped in the full application router, and drives it through
//! `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Once;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::state::AppState;

pub type TestApp = BoxCloneService<Request<Body>, Response, Infallible>;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        // The env-backed config singleton requires these before first load.
        // SAFETY: runs once, before any test has touched the config or the
        // environment.
        unsafe {
            std::env::set_var("DATABASE_PATH", "sqlite::memory:");
            std::env::set_var("JWT_SECRET", "integration-test-secret");
        }
    });
}

pub async fn make_test_app() -> (TestApp, DatabaseConnection) {
    init_test_config();

    let db = db::test_utils::setup_test_db().await;
    let state = AppState::new(db.clone());
    let router: Router = Router::new()
        .nest("/api", api::routes::routes(state.clone()))
        .with_state(state);

    (router.into_service().boxed_clone(), db)
}

/// Fires a single request and returns the status plus the parsed JSON body.
pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
