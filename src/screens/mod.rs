// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen state for each client route.
//!
//! A screen holds what the user is looking at and talks to the document store
//! and auth service on their behalf. Rendering is left to whoever consumes the
//! view models each screen produces.

pub mod auth_forms;
pub mod note_editor;
pub mod notes_dashboard;
pub mod public_note;
pub mod settings;
pub mod task_manager;
pub mod todo_list;

pub use auth_forms::{PasswordResetForm, SignInForm, SignUpForm};
pub use note_editor::{NoteDraft, NoteEditor, SaveOutcome};
pub use notes_dashboard::{NotesDashboard, SortOrder};
pub use public_note::load_public_note;
pub use settings::ProfileUpdate;
pub use task_manager::TaskManager;
pub use todo_list::TodoList;

use serde::Serialize;

/// Lifecycle of a screen's data: loading until the first result arrives,
/// then either loaded or failed with a message for the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum ScreenState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> ScreenState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            ScreenState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScreenState<U> {
        match self {
            ScreenState::Loading => ScreenState::Loading,
            ScreenState::Loaded(data) => ScreenState::Loaded(f(data)),
            ScreenState::Failed(msg) => ScreenState::Failed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_state_serializes_tagged() {
        let loaded = serde_json::to_value(ScreenState::Loaded(vec![1, 2])).unwrap();
        assert_eq!(loaded, serde_json::json!({ "state": "loaded", "data": [1, 2] }));

        let failed = serde_json::to_value(ScreenState::<()>::Failed("Note not found".into())).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({ "state": "failed", "data": "Note not found" })
        );

        let loading = serde_json::to_value(ScreenState::<()>::Loading).unwrap();
        assert_eq!(loading, serde_json::json!({ "state": "loading" }));
    }
}
