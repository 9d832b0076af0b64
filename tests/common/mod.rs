// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use firenotes::config::Config;
use firenotes::db::DocumentStore;
use firenotes::routes::create_router;
use firenotes::services::AuthService;
use firenotes::AppState;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a store connected to the emulator.
#[allow(dead_code)]
pub async fn test_store() -> DocumentStore {
    DocumentStore::connect("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app on in-memory backends with the session listener running.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_backends(
        Config::test_default(),
        DocumentStore::in_memory(),
        AuthService::in_memory(),
    ));
    state.start_session_listener();

    (create_router(state.clone()), state)
}

/// Send a request with an optional JSON body.
/// Returns status, headers and the body parsed as JSON (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, headers, json)
}

#[allow(dead_code)]
pub async fn get(app: &axum::Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    send(app, Method::GET, uri, None).await
}

#[allow(dead_code)]
pub async fn post(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, HeaderMap, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Location header of a redirect.
#[allow(dead_code)]
pub fn location(headers: &HeaderMap) -> &str {
    headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Create an account through the sign-up route and wait for the session.
#[allow(dead_code)]
pub async fn sign_up(app: &axum::Router, state: &AppState, email: &str) -> String {
    let (status, _, body) = post(
        app,
        "/signup",
        serde_json::json!({ "email": email, "password": "secret123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "sign-up failed: {body}");
    assert_eq!(body["redirect"], "/notes");

    assert!(
        state
            .session
            .wait_for(|u| u.is_some(), Duration::from_secs(2))
            .await
    );
    state.session.uid().unwrap()
}

/// Sign out through the route.
#[allow(dead_code)]
pub async fn sign_out(app: &axum::Router, state: &AppState) {
    let (status, _, body) = send(app, Method::POST, "/signout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/signin");
    assert!(!state.session.is_signed_in());
}
