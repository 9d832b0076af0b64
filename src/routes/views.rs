// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presentational views: navbar, cards and the admin dashboard.

use crate::error::Result;
use crate::views::admin::AdminDashboardView;
use crate::views::cards::ProfileCardView;
use crate::views::{admin_dashboard, login_card, navbar, profile_card, LoginCardView, NavbarView};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/navbar", get(get_navbar))
        .route("/dashboard", get(get_admin_dashboard))
        .route("/cards/login", get(get_login_card))
        .route("/cards/profile", get(get_profile_card))
}

/// Navbar for whoever holds the session, signed in or not.
async fn get_navbar(State(state): State<Arc<AppState>>) -> Result<Json<NavbarView>> {
    let dark_mode = state.preferences.dark_mode().await?;
    Ok(Json(navbar(state.session.user().as_ref(), dark_mode)))
}

async fn get_admin_dashboard() -> Json<AdminDashboardView> {
    Json(admin_dashboard())
}

async fn get_login_card() -> Json<LoginCardView> {
    Json(login_card())
}

async fn get_profile_card() -> Json<ProfileCardView> {
    Json(profile_card())
}
