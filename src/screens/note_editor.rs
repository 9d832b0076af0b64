// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Note editor for new and existing notes.
//!
//! The editor keeps a local working copy. Nothing reaches the store until
//! [`NoteEditor::save`], which writes the whole record back.

use crate::db::{collections, DocumentStore};
use crate::error::AppError;
use crate::models::note::COLOR_PALETTE;
use crate::models::{derive_title, Note, NoteFont};
use crate::navigation::Route;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const NOTE_NOT_FOUND: &str = "Note not found";
pub const NOT_YOUR_NOTE: &str = "You do not have permission to view this note";
pub const UNSAVED_DELETE: &str = "Cannot delete unsaved note";
pub const SAVED_PUBLIC: &str = "Note saved! Your permanent link is ready.";
pub const SAVED_PRIVATE: &str = "Note saved successfully!";

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

/// Prefix of the preview id handed out before a note has been saved.
pub const TEMP_LINK_PREFIX: &str = "temp-";

/// Editable fields, as submitted by an editor form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub color: Option<String>,
    pub font: Option<NoteFont>,
    pub pinned: bool,
    pub is_public: bool,
    pub image_urls: Vec<String>,
    pub category: Option<String>,
}

/// Result of a save.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub id: String,
    pub created: bool,
    pub message: &'static str,
    pub share_link: Option<String>,
    /// Where the editor goes next
    pub redirect: String,
}

/// What the editor shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub id: Option<String>,
    pub note: Note,
    pub share_link: Option<String>,
    /// True while the share link is only a preview of an unsaved draft
    pub share_link_is_preview: bool,
    pub font_family: &'static str,
    pub palette: [&'static str; 7],
    pub fonts: Vec<FontOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontOption {
    pub value: &'static str,
    pub name: &'static str,
    pub font_family: &'static str,
}

/// Editor state for one note.
pub struct NoteEditor {
    id: Option<String>,
    note: Note,
    origin: String,
    share_link: Option<String>,
}

impl NoteEditor {
    /// Blank draft owned by `uid`. `origin` prefixes public links.
    pub fn new_note(uid: &str, origin: &str) -> Self {
        Self {
            id: None,
            note: Note::blank(uid),
            origin: origin.to_string(),
            share_link: None,
        }
    }

    /// Load an existing note for `uid`.
    pub async fn load(
        store: &DocumentStore,
        uid: &str,
        id: &str,
        origin: &str,
    ) -> Result<Self, AppError> {
        let doc = store
            .get::<Note>(collections::NOTES, id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOTE_NOT_FOUND.to_string()))?;

        if doc.data.user_id != uid {
            tracing::warn!(note_id = %id, uid, "Refused to open another user's note");
            return Err(AppError::Forbidden(NOT_YOUR_NOTE.to_string()));
        }

        let mut editor = Self {
            id: Some(doc.id),
            note: doc.data,
            origin: origin.to_string(),
            share_link: None,
        };
        editor.refresh_share_link();
        Ok(editor)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn share_link(&self) -> Option<&str> {
        self.share_link.as_deref()
    }

    fn permanent_link(&self, id: &str) -> String {
        format!("{}{}", self.origin, Route::PublicNote(id.to_string()).path())
    }

    fn refresh_share_link(&mut self) {
        self.share_link = match (&self.id, self.note.is_public) {
            (Some(id), true) => Some(self.permanent_link(id)),
            _ => None,
        };
    }

    /// Replace the editable fields with a submitted draft.
    pub fn apply(&mut self, draft: NoteDraft) -> Result<(), AppError> {
        if let Some(color) = draft.color.as_deref() {
            self.set_color(color)?;
        }
        if let Some(font) = draft.font {
            self.set_font(font);
        }

        self.note.title = draft.title;
        self.note.content = draft.content;
        self.note.pinned = draft.pinned;
        self.note.category = draft.category.filter(|c| !c.trim().is_empty());
        self.note.image_urls = draft.image_urls;
        self.note.tags.clear();
        for tag in &draft.tags {
            self.add_tag(tag);
        }

        if draft.is_public != self.note.is_public {
            self.toggle_public();
        }
        Ok(())
    }

    /// Flip public sharing and return the resulting link.
    ///
    /// An unsaved draft gets a preview link that becomes permanent on save.
    pub fn toggle_public(&mut self) -> Option<&str> {
        self.note.is_public = !self.note.is_public;
        self.share_link = match (self.note.is_public, &self.id) {
            (false, _) => None,
            (true, Some(id)) => Some(self.permanent_link(id)),
            (true, None) => {
                let preview = format!("{}{}", TEMP_LINK_PREFIX, Utc::now().timestamp_millis());
                Some(self.permanent_link(&preview))
            }
        };
        self.share_link.as_deref()
    }

    pub fn toggle_pin(&mut self) -> bool {
        self.note.pinned = !self.note.pinned;
        self.note.pinned
    }

    /// Pick a background color from the palette.
    pub fn set_color(&mut self, color: &str) -> Result<(), AppError> {
        let color = color.to_ascii_lowercase();
        if !COLOR_PALETTE.contains(&color.as_str()) {
            return Err(AppError::BadRequest(format!("Unsupported color: {}", color)));
        }
        self.note.color = color;
        Ok(())
    }

    pub fn set_font(&mut self, font: NoteFont) {
        self.note.font = font;
    }

    /// Add a trimmed tag. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.note.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.note.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.note.tags.retain(|t| t != tag);
    }

    /// Attach an uploaded image. Blank and repeated URLs are ignored.
    pub fn add_image(&mut self, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() || self.note.image_urls.iter().any(|u| u == url) {
            return false;
        }
        self.note.image_urls.push(url.to_string());
        true
    }

    pub fn remove_image(&mut self, url: &str) {
        self.note.image_urls.retain(|u| u != url);
    }

    /// Write the note to the store.
    ///
    /// New notes get a fresh id; existing notes are replaced whole. The title
    /// is derived when blank. `updatedAt` (and `createdAt` on first save) is
    /// assigned by the store at write time; the local copy carries this
    /// process's clock until the note is reloaded. Nothing local changes
    /// unless the write succeeds.
    pub async fn save(&mut self, store: &DocumentStore) -> Result<SaveOutcome, AppError> {
        let now = Utc::now();
        let mut record = self.note.clone();
        record.title = derive_title(&record.title, &record.content);
        record.content = record.content.trim().to_string();
        record.updated_at = Some(now);

        let (id, created) = match &self.id {
            Some(id) => {
                store
                    .replace_stamped(collections::NOTES, id, &record, &[UPDATED_AT])
                    .await?;
                (id.clone(), false)
            }
            None => {
                record.created_at = Some(now);
                let id = store
                    .create_stamped(collections::NOTES, &record, &[CREATED_AT, UPDATED_AT])
                    .await?;
                (id, true)
            }
        };

        tracing::info!(note_id = %id, created, public = record.is_public, "Note saved");
        self.note = record;
        self.id = Some(id.clone());
        self.refresh_share_link();

        Ok(SaveOutcome {
            redirect: Route::Note(id.clone()).path(),
            id,
            created,
            message: if self.note.is_public {
                SAVED_PUBLIC
            } else {
                SAVED_PRIVATE
            },
            share_link: self.share_link.clone(),
        })
    }

    /// Delete the note and return where to go next.
    pub async fn delete(&self, store: &DocumentStore) -> Result<Route, AppError> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| AppError::BadRequest(UNSAVED_DELETE.to_string()))?;

        store.delete(collections::NOTES, id).await?;
        tracing::info!(note_id = %id, "Note deleted");
        Ok(Route::Notes)
    }

    pub fn view(&self) -> EditorView {
        EditorView {
            id: self.id.clone(),
            note: self.note.clone(),
            share_link: self.share_link.clone(),
            share_link_is_preview: self
                .share_link
                .as_deref()
                .is_some_and(|l| l.contains(TEMP_LINK_PREFIX)),
            font_family: self.note.font.font_family(),
            palette: COLOR_PALETTE,
            fonts: NoteFont::ALL
                .into_iter()
                .map(|f| FontOption {
                    value: f.as_str(),
                    name: f.name(),
                    font_family: f.font_family(),
                })
                .collect(),
        }
    }
}
