// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared todo board routes. The board is public.

use crate::db::{collections, Document, Filter};
use crate::error::Result;
use crate::models::Todo;
use crate::screens::todo_list::{add_todo, delete_todo, subscribe_todos};
use crate::screens::{ScreenState, TodoList};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/live", get(todos_live))
        .route("/todos/{id}", delete(remove_todo))
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Json<ScreenState<Vec<Document<Todo>>>> {
    let mut list = TodoList::new();
    let todos = state
        .store
        .query::<Todo>(collections::TODOS, &Filter::All)
        .await
        .map(Arc::new);
    list.apply_snapshot(todos);
    Json(list.view().clone())
}

/// Board as a stream: one `todos` event per snapshot.
async fn todos_live(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>>> {
    let subscription = subscribe_todos(&state.store).await?;

    let events = stream::unfold(
        (subscription, TodoList::new()),
        |(mut subscription, mut list)| async move {
            let snapshot = subscription.next().await?;
            list.apply_snapshot(snapshot);
            let event = Event::default().event("todos").json_data(list.view());
            Some((event, (subscription, list)))
        },
    );

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

/// Add a todo. Blank text is ignored with 204.
async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewTodo>,
) -> Result<Response> {
    let response = match add_todo(&state.store, &body.text).await? {
        Some(id) => (StatusCode::CREATED, Json(Created { id })).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

async fn remove_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    delete_todo(&state.store, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
