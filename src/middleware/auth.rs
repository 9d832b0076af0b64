// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gating middleware.

use crate::models::User;
use crate::navigation::{gate, Route};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Signed-in user, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

impl SessionUser {
    pub fn uid(&self) -> &str {
        &self.0.uid
    }
}

/// Middleware for routes that need a session.
///
/// Signed-out visitors are redirected to sign-in.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user) = state.session.user() else {
        tracing::debug!(path = %request.uri().path(), "No session, redirecting to sign-in");
        return Redirect::to(&Route::SignIn.path()).into_response();
    };

    request.extensions_mut().insert(SessionUser(user));
    next.run(request).await
}

/// Middleware for the auth forms.
///
/// Signed-in visitors are sent to their notes instead.
pub async fn redirect_signed_in(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(route) = Route::parse(request.uri().path()) {
        if let Err(target) = gate(&route, state.session.is_signed_in()) {
            tracing::debug!(from = %route.path(), to = %target.path(), "Already signed in");
            return Redirect::to(&target.path()).into_response();
        }
    }

    next.run(request).await
}
