// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Note documents stored in the `notes` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Title used when neither a title nor any content is present.
pub const UNTITLED_NOTE: &str = "Untitled Note";

/// Maximum characters taken from the first content line for a derived title.
pub const DERIVED_TITLE_CHARS: usize = 30;

/// Background colors offered by the editor.
pub const COLOR_PALETTE: [&str; 7] = [
    "#ffffff", "#f9e4e4", "#e8f5e9", "#e3f2fd", "#fff9c4", "#ede7f6", "#ffecb3",
];

pub const DEFAULT_COLOR: &str = "#ffffff";

/// A user's note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Owning user's uid
    #[validate(length(min = 1, message = "note has no owner"))]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_color")]
    #[validate(custom(function = "validate_color"))]
    pub color: String,
    #[serde(default)]
    pub font: NoteFont,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Dashboard tab the note is filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Stored as Firestore timestamps
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::new("color_prefix"))?;
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("color_hex"))
    }
}

impl Note {
    /// Empty note owned by `user_id`.
    pub fn blank(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            color: default_color(),
            font: NoteFont::default(),
            pinned: false,
            is_public: false,
            image_urls: Vec::new(),
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// An empty term matches every note.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
    }

    /// Seconds since the epoch of the last update, 0 when never stamped.
    pub fn updated_secs(&self) -> i64 {
        self.updated_at.map(|t| t.timestamp()).unwrap_or(0)
    }
}

/// Title stored on save.
///
/// Uses the trimmed title when present, otherwise the first line of the
/// trimmed content cut to [`DERIVED_TITLE_CHARS`] characters, otherwise
/// [`UNTITLED_NOTE`].
pub fn derive_title(title: &str, content: &str) -> String {
    let title = title.trim();
    if !title.is_empty() {
        return title.to_string();
    }

    let first_line: String = content
        .trim()
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(DERIVED_TITLE_CHARS)
        .collect();

    if first_line.is_empty() {
        UNTITLED_NOTE.to_string()
    } else {
        first_line
    }
}

/// Typeface choices offered by the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum NoteFont {
    #[default]
    Sans,
    Arial,
    Georgia,
    Times,
}

impl NoteFont {
    pub const ALL: [NoteFont; 4] = [
        NoteFont::Sans,
        NoteFont::Arial,
        NoteFont::Georgia,
        NoteFont::Times,
    ];

    /// Stored identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            NoteFont::Sans => "font-sans",
            NoteFont::Arial => "font-arial",
            NoteFont::Georgia => "font-georgia",
            NoteFont::Times => "font-times",
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            NoteFont::Sans => "Default",
            NoteFont::Arial => "Arial",
            NoteFont::Georgia => "Georgia",
            NoteFont::Times => "Times New Roman",
        }
    }

    pub fn font_family(self) -> &'static str {
        match self {
            NoteFont::Sans => "system-ui, sans-serif",
            NoteFont::Arial => "Arial, sans-serif",
            NoteFont::Georgia => "Georgia, serif",
            NoteFont::Times => "Times New Roman, serif",
        }
    }
}

// Unknown identifiers fall back to the default face.
impl From<String> for NoteFont {
    fn from(value: String) -> Self {
        NoteFont::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .unwrap_or_default()
    }
}

impl From<NoteFont> for &'static str {
    fn from(font: NoteFont) -> Self {
        font.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_from_first_line() {
        assert_eq!(derive_title("", "Buy milk\nand eggs"), "Buy milk");
        assert_eq!(derive_title("   ", "  \n  Buy milk\nand eggs"), "Buy milk");
    }

    #[test]
    fn test_derive_title_truncates_to_thirty_chars() {
        let content = "abcdefghijklmnopqrstuvwxyz0123456789\nsecond";
        assert_eq!(derive_title("", content), "abcdefghijklmnopqrstuvwxyz0123");
        assert_eq!(derive_title("", content).chars().count(), 30);
    }

    #[test]
    fn test_derive_title_untitled() {
        assert_eq!(derive_title("", ""), UNTITLED_NOTE);
        assert_eq!(derive_title("  ", " \n\t "), UNTITLED_NOTE);
    }

    #[test]
    fn test_timestamps_stay_plain_in_json() {
        use chrono::TimeZone;

        let mut note = Note::blank("u1");
        note.updated_at = Some(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["updatedAt"], "2025-03-01T12:00:00Z");
        assert!(json["createdAt"].is_null());

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back.updated_at, note.updated_at);

        let legacy: Note = serde_json::from_value(serde_json::json!({ "userId": "u1" })).unwrap();
        assert!(legacy.updated_at.is_none());
    }

    #[test]
    fn test_explicit_title_is_trimmed() {
        assert_eq!(derive_title("  Groceries ", "Buy milk"), "Groceries");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut note = Note::blank("u1");
        note.title = "Weekly PLAN".to_string();
        note.content = "call the Bank".to_string();

        assert!(note.matches_search("plan"));
        assert!(note.matches_search("BANK"));
        assert!(note.matches_search(""));
        assert!(!note.matches_search("dentist"));
    }

    #[test]
    fn test_read_with_missing_optional_fields() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "title": "hello"
        }))
        .unwrap();

        assert_eq!(note.color, DEFAULT_COLOR);
        assert_eq!(note.font, NoteFont::Sans);
        assert!(note.tags.is_empty());
        assert!(note.updated_at.is_none());
        assert!(note.validate().is_ok());
    }

    #[test]
    fn test_unknown_font_falls_back() {
        let note: Note = serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "font": "font-comic"
        }))
        .unwrap();
        assert_eq!(note.font, NoteFont::Sans);

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["font"], "font-sans");
        assert_eq!(json["isPublic"], false);
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        let mut note = Note::blank("");
        assert!(note.validate().is_err());

        note.user_id = "u1".to_string();
        note.color = "red".to_string();
        assert!(note.validate().is_err());

        note.color = "#E3F2FD".to_string();
        assert!(note.validate().is_ok());
    }
}
