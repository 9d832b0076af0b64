// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and settings routes.

use crate::error::{AppError, Result};
use crate::middleware::SessionUser;
use crate::routes::auth::SESSION_SYNC_TIMEOUT;
use crate::screens::ProfileUpdate;
use crate::views::{profile, ProfileView};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/settings", get(get_settings).post(update_settings))
        .route("/settings/appearance", post(toggle_appearance))
}

async fn get_profile(Extension(user): Extension<SessionUser>) -> Json<ProfileView> {
    Json(profile(&user.0))
}

// ─── Settings ─────────────────────────────────────────────────

/// Settings form, prefilled from the session.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub display_name: String,
    pub email: String,
    pub dark_mode: bool,
}

async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<SettingsView>> {
    Ok(Json(SettingsView {
        display_name: user.0.display_name.clone().unwrap_or_default(),
        email: user.0.email.clone().unwrap_or_default(),
        dark_mode: state.preferences.dark_mode().await?,
    }))
}

#[derive(Serialize)]
pub struct SettingsSaved {
    pub message: &'static str,
    pub profile: ProfileView,
}

/// Apply a settings form and return the updated profile.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<SettingsSaved>> {
    let message = update.apply(&state.auth).await?;

    let updated = state.auth.current_user().ok_or(AppError::Unauthorized)?;
    let target = Some(updated.clone());
    if !state
        .session
        .wait_for(|u| *u == target, SESSION_SYNC_TIMEOUT)
        .await
    {
        tracing::warn!(uid = %user.uid(), "Session did not pick up profile change");
    }

    tracing::info!(uid = %user.uid(), "Profile updated");
    Ok(Json(SettingsSaved {
        message,
        profile: profile(&updated),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub dark_mode: bool,
}

async fn toggle_appearance(State(state): State<Arc<AppState>>) -> Result<Json<Appearance>> {
    let dark_mode = state.preferences.toggle_dark_mode().await?;
    tracing::debug!(dark_mode, "Appearance toggled");
    Ok(Json(Appearance { dark_mode }))
}
