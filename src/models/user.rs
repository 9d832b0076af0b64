//! Signed-in user as reported by the authentication service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account record owned by the auth service. The app only reads it and asks
/// the service for changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable account identifier (owner key on notes and tasks)
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// When the account was created
    pub created_at: Option<DateTime<Utc>>,
    /// Most recent successful sign-in
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl User {
    /// Minimal user with only an id and email.
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: Some(email.into()),
            display_name: None,
            photo_url: None,
            created_at: None,
            last_sign_in_at: None,
        }
    }

    /// Avatar letter: first character of the email, upper-cased, or `U`.
    pub fn initial(&self) -> char {
        self.email
            .as_deref()
            .and_then(|e| e.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }

    /// Name shown in headers: display name, else the email's local part.
    pub fn label(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}
