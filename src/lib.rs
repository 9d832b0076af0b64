// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Firenotes: notes, tasks and todos on Firebase.
//!
//! This crate provides a headless app shell over Firestore and Firebase
//! Authentication: screen state for each client route, and an HTTP surface
//! that exposes those screens as JSON with live lists over Server-Sent Events.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod screens;
pub mod services;
pub mod time_utils;
pub mod views;

use config::Config;
use db::DocumentStore;
use services::{AuthService, ImageUploader, PreferenceStore, SessionContext};
use tokio::task::JoinHandle;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: DocumentStore,
    pub auth: AuthService,
    pub session: SessionContext,
    pub preferences: PreferenceStore,
    pub uploader: ImageUploader,
}

impl AppState {
    /// Connect to the configured backends.
    ///
    /// Offline mode uses the in-memory store and account table.
    pub async fn from_config(config: Config) -> Result<Self, error::AppError> {
        let (store, auth) = if config.offline {
            tracing::warn!("Offline mode: using in-memory store and accounts");
            (DocumentStore::in_memory(), AuthService::in_memory())
        } else {
            (
                DocumentStore::connect(&config.firebase_project_id).await?,
                AuthService::firebase(config.firebase_api_key.clone()),
            )
        };

        Ok(Self::with_backends(config, store, auth))
    }

    pub fn with_backends(config: Config, store: DocumentStore, auth: AuthService) -> Self {
        Self {
            preferences: PreferenceStore::new(config.preferences_path.clone()),
            uploader: ImageUploader::from_config(&config),
            session: SessionContext::new(),
            config,
            store,
            auth,
        }
    }

    /// Register the session listener. Call once at startup.
    pub fn start_session_listener(&self) -> JoinHandle<()> {
        services::spawn_session_listener(&self.auth, self.session.clone())
    }
}
