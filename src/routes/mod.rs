// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod account;
pub mod auth;
pub mod notes;
pub mod tasks;
pub mod todos;
pub mod uploads;
pub mod views;

use crate::middleware::{redirect_signed_in, require_session};
use crate::navigation::landing;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, Method};
use axum::response::Redirect;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
    pub offline: bool,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
        offline: state.config.offline,
    })
}

/// `/` and unknown paths land on the notes list or the sign-in form.
async fn land(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::to(&landing(state.session.is_signed_in()).path())
}

/// Body returned by form submissions that navigate somewhere.
#[derive(Debug, Serialize, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct Navigate {
    pub redirect: String,
}

impl Navigate {
    pub fn to(route: crate::navigation::Route) -> Json<Self> {
        Json(Self {
            redirect: route.path(),
        })
    }
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from the public origin and localhost (for dev)
    let public_origin = state.config.public_origin.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == public_origin
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/", get(land))
        .route("/health", get(health_check))
        .merge(notes::public_routes())
        .merge(todos::routes())
        .merge(views::routes());

    // Sign-in, sign-up and password reset (signed-out visitors only)
    let guest_routes = auth::guest_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        redirect_signed_in,
    ));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .merge(auth::session_routes())
        .merge(notes::routes())
        .merge(tasks::routes())
        .merge(account::routes())
        .merge(uploads::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(guest_routes)
        .merge(protected_routes)
        .fallback(land)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
