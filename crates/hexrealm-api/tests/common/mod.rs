//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use hexrealm_core::repository::EventRepository;
use hexrealm_engine::{Engine, EngineConfig};
use hexrealm_event_store::InMemoryEventRepository;
use hexrealm_test_support::{FixedClock, MockRng};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hexrealm_api::state::AppState;

/// The router plus a handle on the engine behind it, so tests can wait
/// for reactions to settle before reading.
pub struct TestApp {
    pub router: Router,
    pub engine: Arc<Engine>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn settle(&self) {
        self.engine.wait_until_idle().await;
    }
}

/// Build the full app over an in-memory event store with a fixed clock and
/// an all-plains map generator. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(InMemoryEventRepository::new()))
}

/// Build the full app over the given event store.
pub fn build_test_app_with(event_repository: Arc<dyn EventRepository>) -> TestApp {
    let engine = Engine::start(
        event_repository,
        Arc::new(FixedClock::default()),
        Box::new(MockRng),
        EngineConfig::default(),
    )
    .unwrap();
    let engine = Arc::new(engine);
    TestApp {
        router: hexrealm_api::app(AppState::new(Arc::clone(&engine))),
        engine,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
