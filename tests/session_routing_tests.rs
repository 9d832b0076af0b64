// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gating, auth form and CORS tests.
//!
//! These tests verify that:
//! 1. Signed-out visitors are sent to sign-in from protected screens
//! 2. Signed-in visitors are sent to their notes from the auth forms
//! 3. Auth failures come back with a readable message
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app, get, location, post, send, sign_out, sign_up};

#[tokio::test]
async fn test_protected_routes_redirect_to_signin() {
    let (app, _) = create_test_app();

    for uri in ["/notes", "/new-note", "/note/abc", "/profile", "/settings", "/tasks"] {
        let (status, headers, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&headers), "/signin", "{uri}");
    }
}

#[tokio::test]
async fn test_public_routes_need_no_session() {
    let (app, _) = create_test_app();

    for uri in ["/todos", "/dashboard", "/navbar", "/health", "/signin"] {
        let (status, _, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_landing_follows_session() {
    let (app, state) = create_test_app();

    let (status, headers, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/signin");

    let (_, headers, _) = get(&app, "/no/such/page").await;
    assert_eq!(location(&headers), "/signin");

    sign_up(&app, &state, "landing@example.com").await;

    let (_, headers, _) = get(&app, "/").await;
    assert_eq!(location(&headers), "/notes");
    let (_, headers, _) = get(&app, "/no/such/page").await;
    assert_eq!(location(&headers), "/notes");
}

#[tokio::test]
async fn test_auth_forms_redirect_when_signed_in() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "guest-only@example.com").await;

    for uri in ["/signin", "/signup", "/password-reset"] {
        let (status, headers, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&headers), "/notes", "{uri}");
    }
}

#[tokio::test]
async fn test_sign_out_then_sign_in_again() {
    let (app, state) = create_test_app();
    let uid = sign_up(&app, &state, "again@example.com").await;

    sign_out(&app, &state).await;
    let (status, _, _) = get(&app, "/notes").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, _, body) = post(
        &app,
        "/signin",
        json!({ "email": "again@example.com", "password": "secret123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/notes");
    assert_eq!(state.session.uid().as_deref(), Some(uid.as_str()));
}

#[tokio::test]
async fn test_wrong_password_keeps_visitor_signed_out() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "wrong@example.com").await;
    sign_out(&app, &state).await;

    let (status, _, body) = post(
        &app,
        "/signin",
        json!({ "email": "wrong@example.com", "password": "not-it" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "INVALID_LOGIN_CREDENTIALS");
    assert!(!state.session.is_signed_in());
}

#[tokio::test]
async fn test_form_validation_messages() {
    let (app, _) = create_test_app();

    let (status, _, body) = post(
        &app,
        "/signin",
        json!({ "email": "not-an-email", "password": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please enter a valid email address");

    let (status, _, body) = post(
        &app,
        "/signup",
        json!({ "email": "short@example.com", "password": "12345" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters long.");
}

#[tokio::test]
async fn test_duplicate_sign_up_is_rejected() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "twice@example.com").await;
    sign_out(&app, &state).await;

    let (status, _, body) = post(
        &app,
        "/signup",
        json!({ "email": "twice@example.com", "password": "secret123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_password_reset() {
    let (app, state) = create_test_app();
    sign_up(&app, &state, "forgetful@example.com").await;
    sign_out(&app, &state).await;

    let (status, _, body) = post(
        &app,
        "/password-reset",
        json!({ "email": "forgetful@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset email sent! Check your inbox.");

    let memory = state.auth.memory().unwrap();
    assert_eq!(memory.password_resets_sent("forgetful@example.com"), 1);

    let (status, _, body) = post(
        &app,
        "/password-reset",
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "EMAIL_NOT_FOUND");
}

#[tokio::test]
async fn test_signout_needs_session() {
    let (app, _) = create_test_app();

    let (status, headers, _) = send(&app, Method::POST, "/signout", None).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location(&headers), "/signin");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let (app, _) = create_test_app();

    for uri in ["/health", "/notes", "/view/note/missing"] {
        let (_, headers, _) = get(&app, uri).await;
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY", "{uri}");
        assert_eq!(headers.get("Cache-Control").unwrap(), "no-store", "{uri}");
    }
}

#[tokio::test]
async fn test_cors_preflight_allows_public_origin() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/notes")
                .header(header::ORIGIN, state.config.public_origin.as_str())
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        state.config.public_origin.as_str()
    );
}
