// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task manager routes.

use crate::error::Result;
use crate::middleware::SessionUser;
use crate::screens::task_manager::TaskListView;
use crate::screens::TaskManager;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(add_task))
        .route("/tasks/{id}", delete(delete_task))
}

#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub task: String,
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<TaskListView>> {
    let manager = TaskManager::load(state.store.clone(), user.uid()).await?;
    Ok(Json(manager.view()))
}

/// Add a task and return the refreshed list. Blank input changes nothing.
async fn add_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(body): Json<NewTask>,
) -> Result<Json<TaskListView>> {
    let mut manager = TaskManager::load(state.store.clone(), user.uid()).await?;
    manager.add(&body.task).await?;
    Ok(Json(manager.view()))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<TaskListView>> {
    let mut manager = TaskManager::load(state.store.clone(), user.uid()).await?;
    manager.delete(&id).await?;
    Ok(Json(manager.view()))
}
