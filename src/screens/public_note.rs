//! Read-only view of a shared note. Needs no session.

use crate::db::{collections, Document, DocumentStore};
use crate::error::AppError;
use crate::models::Note;
use crate::time_utils::format_date;
use serde::Serialize;

pub const INVALID_NOTE_ID: &str = "Invalid note ID";
pub const NOTE_IS_PRIVATE: &str = "This note is private";

/// Load a note for the public link. Only notes marked public are returned.
pub async fn load_public_note(
    store: &DocumentStore,
    id: &str,
) -> Result<Document<Note>, AppError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::BadRequest(INVALID_NOTE_ID.to_string()));
    }

    let doc = store
        .get::<Note>(collections::NOTES, id)
        .await?
        .ok_or_else(|| AppError::NotFound(super::note_editor::NOTE_NOT_FOUND.to_string()))?;

    if !doc.data.is_public {
        return Err(AppError::Forbidden(NOTE_IS_PRIVATE.to_string()));
    }
    Ok(doc)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicNoteView {
    pub title: String,
    pub content: String,
    pub date: String,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub color: String,
    pub font_family: &'static str,
}

impl From<&Document<Note>> for PublicNoteView {
    fn from(doc: &Document<Note>) -> Self {
        let note = &doc.data;
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            date: format_date(note.updated_at.or(note.created_at)),
            tags: note.tags.clone(),
            image_urls: note.image_urls.clone(),
            color: note.color.clone(),
            font_family: note.font.font_family(),
        }
    }
}
