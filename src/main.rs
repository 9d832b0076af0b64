// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firenotes server
//!
//! Serves the notes, tasks and todo screens over HTTP, backed by Firestore
//! and Firebase Authentication (or in-memory backends in offline mode).

use firenotes::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        project = %config.firebase_project_id,
        offline = config.offline,
        "Starting Firenotes"
    );

    // Connect backends and start mirroring auth state into the session
    let state = Arc::new(AppState::from_config(config).await?);
    let _listener = state.start_session_listener();
    tracing::info!("Session listener registered");

    // Build router
    let app = firenotes::routes::create_router(state);

    // Start server
    if !addr.ip().is_loopback() {
        tracing::warn!(address = %addr, "Listening beyond loopback; every client shares the signed-in session");
    }
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("firenotes=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
