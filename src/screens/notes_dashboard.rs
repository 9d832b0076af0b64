// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notes dashboard: the signed-in user's notes, live.
//!
//! Every snapshot from the owner-filtered subscription replaces the list
//! wholesale. Sorting, search and the category tabs are applied locally on
//! top of the latest snapshot.

use crate::db::{collections, Document, DocumentStore, Filter, Subscription};
use crate::error::AppError;
use crate::models::note::UNTITLED_NOTE;
use crate::models::Note;
use crate::screens::ScreenState;
use crate::time_utils::format_date;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Category tabs; `all` shows every note.
pub const CATEGORIES: [&str; 5] = ["all", "work", "personal", "ideas", "tasks"];

pub const ALL_CATEGORIES: &str = "all";

const NO_CONTENT: &str = "No content";

/// Order of the list by last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Desc,
    Asc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Desc => SortOrder::Asc,
            SortOrder::Asc => SortOrder::Desc,
        }
    }
}

/// Open the live query behind the dashboard.
pub async fn subscribe_notes(
    store: &DocumentStore,
    uid: &str,
) -> Result<Subscription<Note>, AppError> {
    store
        .subscribe(collections::NOTES, Filter::eq("userId", uid))
        .await
}

/// Notes the dashboard shows, in display order.
///
/// Keeps notes owned by `uid` whose title or content contains `term`
/// (ignoring case) and, unless `category` is `all`, filed under `category`.
/// Missing timestamps sort as the epoch; ties fall back to the document id
/// so reversing the order is exact.
pub fn visible_notes<'a>(
    notes: &'a [Document<Note>],
    uid: &str,
    term: &str,
    category: &str,
    order: SortOrder,
) -> Vec<&'a Document<Note>> {
    let mut visible: Vec<&Document<Note>> = notes
        .iter()
        .filter(|n| n.data.user_id == uid)
        .filter(|n| n.data.matches_search(term))
        .filter(|n| category == ALL_CATEGORIES || n.data.category.as_deref() == Some(category))
        .collect();

    visible.sort_by(|a, b| {
        a.data
            .updated_secs()
            .cmp(&b.data.updated_secs())
            .then_with(|| a.id.cmp(&b.id))
    });
    if order == SortOrder::Desc {
        visible.reverse();
    }
    visible
}

/// Dashboard screen state.
pub struct NotesDashboard {
    uid: String,
    notes: ScreenState<Arc<Vec<Document<Note>>>>,
    sort: SortOrder,
    search_visible: bool,
    search_term: String,
    category: String,
}

/// One row in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard {
    pub id: String,
    pub title: String,
    pub date: String,
    pub category: Option<String>,
    pub excerpt: String,
    pub color: String,
    pub pinned: bool,
    pub is_public: bool,
    pub href: String,
}

impl NoteCard {
    fn from_document(doc: &Document<Note>) -> Self {
        let note = &doc.data;
        Self {
            id: doc.id.clone(),
            title: if note.title.is_empty() {
                UNTITLED_NOTE.to_string()
            } else {
                note.title.clone()
            },
            date: format_date(note.updated_at),
            category: note
                .category
                .clone()
                .filter(|c| c.as_str() != ALL_CATEGORIES),
            excerpt: if note.content.is_empty() {
                NO_CONTENT.to_string()
            } else {
                note.content.clone()
            },
            color: note.color.clone(),
            pinned: note.pinned,
            is_public: note.is_public,
            href: crate::navigation::Route::Note(doc.id.clone()).path(),
        }
    }
}

/// Message shown instead of an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyMessage {
    pub heading: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub notes: ScreenState<Vec<NoteCard>>,
    pub empty: Option<EmptyMessage>,
    pub sort: SortOrder,
    pub search_visible: bool,
    pub search_term: String,
    pub category: String,
    pub categories: [&'static str; 5],
}

/// Query parameters accepted by the dashboard route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
    pub category: Option<String>,
}

impl NotesDashboard {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            notes: ScreenState::Loading,
            sort: SortOrder::default(),
            search_visible: false,
            search_term: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }

    /// Replace the list with a new snapshot, or record why it failed.
    pub fn apply_snapshot(&mut self, snapshot: Result<Arc<Vec<Document<Note>>>, AppError>) {
        self.notes = match snapshot {
            Ok(notes) => ScreenState::Loaded(notes),
            Err(e) => {
                tracing::error!(uid = %self.uid, error = %e, "Error fetching notes");
                ScreenState::Failed(e.to_string())
            }
        };
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// Show or hide the search box. Hiding it clears the term.
    pub fn toggle_search(&mut self) {
        if self.search_visible {
            self.search_term.clear();
        }
        self.search_visible = !self.search_visible;
    }

    pub fn set_search(&mut self, term: &str) {
        self.search_visible = true;
        self.search_term = term.to_string();
    }

    pub fn set_category(&mut self, category: &str) -> Result<(), AppError> {
        if !CATEGORIES.contains(&category) {
            return Err(AppError::BadRequest(format!(
                "Unknown category: {}",
                category
            )));
        }
        self.category = category.to_string();
        Ok(())
    }

    /// Apply the controls carried by a route's query string.
    pub fn apply_query(&mut self, query: &DashboardQuery) -> Result<(), AppError> {
        if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
            self.set_search(term);
        }
        if let Some(sort) = query.sort {
            self.sort = sort;
        }
        if let Some(category) = query.category.as_deref() {
            self.set_category(category)?;
        }
        Ok(())
    }

    pub fn visible(&self) -> Vec<&Document<Note>> {
        match &self.notes {
            ScreenState::Loaded(notes) => visible_notes(
                notes,
                &self.uid,
                &self.search_term,
                &self.category,
                self.sort,
            ),
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> DashboardView {
        let notes = match &self.notes {
            ScreenState::Loading => ScreenState::Loading,
            ScreenState::Failed(msg) => ScreenState::Failed(msg.clone()),
            ScreenState::Loaded(_) => ScreenState::Loaded(
                self.visible()
                    .into_iter()
                    .map(NoteCard::from_document)
                    .collect::<Vec<_>>(),
            ),
        };

        let empty = match &notes {
            ScreenState::Loaded(cards) if cards.is_empty() => Some(if self.search_term.is_empty() {
                EmptyMessage {
                    heading: "No notes",
                    hint: "Create a note to get started",
                }
            } else {
                EmptyMessage {
                    heading: "No matching notes found",
                    hint: "Try using different keywords or clear your search",
                }
            }),
            _ => None,
        };

        DashboardView {
            notes,
            empty,
            sort: self.sort,
            search_visible: self.search_visible,
            search_term: self.search_term.clone(),
            category: self.category.clone(),
            categories: CATEGORIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: &str, owner: &str, title: &str, updated: Option<i64>) -> Document<Note> {
        let mut note = Note::blank(owner);
        note.title = title.to_string();
        note.updated_at = updated.map(|s| Utc.timestamp_opt(s, 0).unwrap());
        Document {
            id: id.to_string(),
            data: note,
        }
    }

    fn ids(notes: &[&Document<Note>]) -> Vec<String> {
        notes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_only_owner_notes_are_visible() {
        let notes = vec![
            note("a", "alice", "Groceries", Some(10)),
            note("b", "bob", "Groceries", Some(20)),
        ];
        let visible = visible_notes(&notes, "alice", "", ALL_CATEGORIES, SortOrder::Desc);
        assert_eq!(ids(&visible), vec!["a"]);
    }

    #[test]
    fn test_search_matches_title_or_content_ignoring_case() {
        let mut with_content = note("c", "alice", "Weekend", Some(5));
        with_content.data.content = "call the PLUMBER".to_string();
        let notes = vec![
            note("a", "alice", "Plumbing quotes", Some(10)),
            note("b", "alice", "Groceries", Some(20)),
            with_content,
        ];

        let visible = visible_notes(&notes, "alice", "plumb", ALL_CATEGORIES, SortOrder::Desc);
        assert_eq!(ids(&visible), vec!["a", "c"]);
    }

    #[test]
    fn test_sort_toggle_reverses_and_missing_time_is_oldest() {
        let notes = vec![
            note("a", "u", "A", Some(30)),
            note("b", "u", "B", None),
            note("c", "u", "C", Some(10)),
            note("d", "u", "D", Some(10)),
        ];

        let desc = ids(&visible_notes(&notes, "u", "", ALL_CATEGORIES, SortOrder::Desc));
        let mut asc = ids(&visible_notes(&notes, "u", "", ALL_CATEGORIES, SortOrder::Asc));
        assert_eq!(desc.first().map(String::as_str), Some("a"));
        assert_eq!(desc.last().map(String::as_str), Some("b"));

        asc.reverse();
        assert_eq!(desc, asc);
        assert_eq!(SortOrder::Desc.toggled().toggled(), SortOrder::Desc);
    }

    #[test]
    fn test_category_tab_filters() {
        let mut work = note("a", "u", "Standup", Some(1));
        work.data.category = Some("work".to_string());
        let notes = vec![work, note("b", "u", "Loose", Some(2))];

        assert_eq!(ids(&visible_notes(&notes, "u", "", "work", SortOrder::Desc)), vec!["a"]);
        assert_eq!(visible_notes(&notes, "u", "", ALL_CATEGORIES, SortOrder::Desc).len(), 2);
    }

    #[test]
    fn test_view_states_and_empty_messages() {
        let mut dashboard = NotesDashboard::new("alice");
        assert!(dashboard.view().notes.is_loading());

        dashboard.apply_snapshot(Ok(Arc::new(Vec::new())));
        assert_eq!(dashboard.view().empty.unwrap().heading, "No notes");

        dashboard.set_search("zzz");
        assert_eq!(
            dashboard.view().empty.unwrap().heading,
            "No matching notes found"
        );

        dashboard.toggle_search();
        assert!(dashboard.view().search_term.is_empty());

        dashboard.apply_snapshot(Err(AppError::Database("unavailable".into())));
        assert!(dashboard.view().notes.error().is_some());
    }

    #[test]
    fn test_card_fallbacks() {
        let card = NoteCard::from_document(&note("a", "u", "", None));
        assert_eq!(card.title, "Untitled Note");
        assert_eq!(card.excerpt, "No content");
        assert_eq!(card.date, "Unknown date");
        assert_eq!(card.href, "/note/a");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut dashboard = NotesDashboard::new("alice");
        assert!(dashboard.set_category("recipes").is_err());
        assert!(dashboard.set_category("ideas").is_ok());
    }
}
