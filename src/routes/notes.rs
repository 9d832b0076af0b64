// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notes dashboard, editor and public view routes.

use crate::db::{collections, Filter};
use crate::error::Result;
use crate::middleware::SessionUser;
use crate::models::Note;
use crate::routes::Navigate;
use crate::screens::note_editor::EditorView;
use crate::screens::notes_dashboard::{subscribe_notes, DashboardQuery, DashboardView};
use crate::screens::public_note::PublicNoteView;
use crate::screens::{load_public_note, NoteDraft, NoteEditor, NotesDashboard, SaveOutcome};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Extension, Json, Router,
};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Routes that need a session.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", get(dashboard))
        .route("/notes/live", get(dashboard_live))
        .route("/new-note", get(new_note).post(create_note))
        .route(
            "/note/{id}",
            get(open_note).put(save_note).delete(delete_note),
        )
        .route("/note/{id}/pin", post(toggle_pin))
        .route(
            "/note/{id}/images",
            post(attach_image).delete(detach_image),
        )
        .route("/editor/toggle-public", post(toggle_public))
}

/// Routes anyone may visit.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/view/note/{id}", get(view_public_note))
}

// ─── Dashboard ────────────────────────────────────────────────

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>> {
    let mut screen = NotesDashboard::new(user.uid());
    screen.apply_query(&query)?;

    let notes = state
        .store
        .query::<Note>(collections::NOTES, &Filter::eq("userId", user.uid()))
        .await
        .map(Arc::new);
    screen.apply_snapshot(notes);

    Ok(Json(screen.view()))
}

/// Dashboard as a stream: one `notes` event per snapshot.
async fn dashboard_live(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>>> {
    let mut screen = NotesDashboard::new(user.uid());
    screen.apply_query(&query)?;
    let subscription = subscribe_notes(&state.store, user.uid()).await?;
    tracing::debug!(uid = %user.uid(), "Notes stream opened");

    let events = stream::unfold(
        (subscription, screen),
        |(mut subscription, mut screen)| async move {
            let snapshot = subscription.next().await?;
            screen.apply_snapshot(snapshot);
            let event = Event::default().event("notes").json_data(screen.view());
            Some((event, (subscription, screen)))
        },
    );

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

// ─── Editor ───────────────────────────────────────────────────

async fn new_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Json<EditorView> {
    Json(NoteEditor::new_note(user.uid(), &state.config.public_origin).view())
}

async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<SaveOutcome>)> {
    let mut editor = NoteEditor::new_note(user.uid(), &state.config.public_origin);
    editor.apply(draft)?;
    let outcome = editor.save(&state.store).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn open_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<EditorView>> {
    let editor =
        NoteEditor::load(&state.store, user.uid(), &id, &state.config.public_origin).await?;
    Ok(Json(editor.view()))
}

async fn save_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(draft): Json<NoteDraft>,
) -> Result<Json<SaveOutcome>> {
    let mut editor =
        NoteEditor::load(&state.store, user.uid(), &id, &state.config.public_origin).await?;
    editor.apply(draft)?;
    Ok(Json(editor.save(&state.store).await?))
}

async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<Navigate>> {
    let editor =
        NoteEditor::load(&state.store, user.uid(), &id, &state.config.public_origin).await?;
    let next = editor.delete(&state.store).await?;
    Ok(Navigate::to(next))
}

/// Flip the pin on a saved note and store it.
async fn toggle_pin(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<EditorView>> {
    let mut editor =
        NoteEditor::load(&state.store, user.uid(), &id, &state.config.public_origin).await?;
    let pinned = editor.toggle_pin();
    editor.save(&state.store).await?;
    tracing::debug!(note_id = %id, pinned, "Note pin toggled");
    Ok(Json(editor.view()))
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub url: String,
}

/// Attach an uploaded image URL to a saved note.
async fn attach_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<EditorView>> {
    let mut editor =
        NoteEditor::load(&state.store, user.uid(), &id, &state.config.public_origin).await?;
    if editor.add_image(&req.url) {
        editor.save(&state.store).await?;
    }
    Ok(Json(editor.view()))
}

async fn detach_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<EditorView>> {
    let mut editor =
        NoteEditor::load(&state.store, user.uid(), &id, &state.config.public_origin).await?;
    editor.remove_image(&req.url);
    editor.save(&state.store).await?;
    Ok(Json(editor.view()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglePublicRequest {
    /// Saved note, or `None` for an unsaved draft
    pub id: Option<String>,
    /// Current state before the toggle
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TogglePublicResponse {
    pub is_public: bool,
    pub share_link: Option<String>,
}

/// Preview the share link a toggle would produce. Nothing is saved.
async fn toggle_public(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(req): Json<TogglePublicRequest>,
) -> Result<Json<TogglePublicResponse>> {
    let origin = &state.config.public_origin;
    let mut editor = match req.id.as_deref() {
        Some(id) => NoteEditor::load(&state.store, user.uid(), id, origin).await?,
        None => NoteEditor::new_note(user.uid(), origin),
    };
    if editor.note().is_public != req.is_public {
        editor.toggle_public();
    }

    let share_link = editor.toggle_public().map(str::to_string);
    Ok(Json(TogglePublicResponse {
        is_public: editor.note().is_public,
        share_link,
    }))
}

// ─── Public view ──────────────────────────────────────────────

async fn view_public_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PublicNoteView>> {
    let doc = load_public_note(&state.store, &id).await?;
    tracing::debug!(note_id = %doc.id, "Public note viewed");
    Ok(Json(PublicNoteView::from(&doc)))
}
