// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, sign-up, password reset and sign-out routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::navigation::Route;
use crate::routes::Navigate;
use crate::screens::{PasswordResetForm, SignInForm, SignUpForm};
use crate::views::{login_card, LoginCardView};
use crate::AppState;

/// How long a form submission waits for the session listener to catch up.
pub(crate) const SESSION_SYNC_TIMEOUT: Duration = Duration::from_secs(2);

/// Routes only reachable while signed out.
pub fn guest_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signin", get(sign_in_page).post(sign_in))
        .route("/signup", get(sign_up_page).post(sign_up))
        .route(
            "/password-reset",
            get(password_reset_page).post(password_reset),
        )
}

/// Routes that need a session.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/signout", post(sign_out))
}

/// Wait until the session reflects the auth state for `uid` (or signed out).
///
/// The listener normally wins the race well within the timeout; if it
/// doesn't, the response goes out anyway and the session catches up.
pub(crate) async fn sync_session(state: &AppState, uid: Option<&str>) {
    let synced = state
        .session
        .wait_for(
            |user| user.as_ref().map(|u| u.uid.as_str()) == uid,
            SESSION_SYNC_TIMEOUT,
        )
        .await;
    if !synced {
        tracing::warn!(?uid, "Session did not update before timeout");
    }
}

// ─── Pages ────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPage {
    pub form: &'static str,
    pub card: LoginCardView,
}

async fn sign_in_page() -> Json<AuthPage> {
    Json(AuthPage {
        form: "signin",
        card: login_card(),
    })
}

async fn sign_up_page() -> Json<AuthPage> {
    Json(AuthPage {
        form: "signup",
        card: login_card(),
    })
}

async fn password_reset_page() -> Json<AuthPage> {
    Json(AuthPage {
        form: "password-reset",
        card: login_card(),
    })
}

// ─── Submissions ──────────────────────────────────────────────

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignInForm>,
) -> Result<Json<Navigate>> {
    let route = form.submit(&state.auth).await?;
    let uid = state.auth.current_user().map(|u| u.uid);
    sync_session(&state, uid.as_deref()).await;

    tracing::info!(?uid, "Signed in");
    Ok(Navigate::to(route))
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignUpForm>,
) -> Result<Json<Navigate>> {
    let route = form.submit(&state.auth).await?;
    let uid = state.auth.current_user().map(|u| u.uid);
    sync_session(&state, uid.as_deref()).await;

    tracing::info!(?uid, "Account created");
    Ok(Navigate::to(route))
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

async fn password_reset(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PasswordResetForm>,
) -> Result<Json<MessageResponse>> {
    let message = form.submit(&state.auth).await?;
    Ok(Json(MessageResponse { message }))
}

async fn sign_out(State(state): State<Arc<AppState>>) -> Json<Navigate> {
    state.auth.sign_out().await;
    sync_session(&state, None).await;

    tracing::info!("Signed out");
    Navigate::to(Route::SignIn)
}
