//! Profile page for the signed-in user.

use crate::models::User;
use crate::navigation::Route;
use crate::time_utils::format_date;
use chrono::{DateTime, Utc};
use serde::Serialize;

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub photo_url: Option<String>,
    /// Avatar letter shown when there is no photo
    pub initial: char,
    pub name: String,
    pub email_heading: String,
    pub display_name: String,
    pub email: String,
    pub account_created: String,
    pub last_sign_in: String,
    pub edit_href: String,
}

pub fn profile(user: &User) -> ProfileView {
    let date_or_unknown = |d: Option<DateTime<Utc>>| {
        d.map(|d| format_date(Some(d)))
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    ProfileView {
        photo_url: user.photo_url.clone(),
        initial: user.initial(),
        name: user.label(),
        email_heading: user
            .email
            .clone()
            .unwrap_or_else(|| "No email available".to_string()),
        display_name: user
            .display_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Not set".to_string()),
        email: user
            .email
            .clone()
            .unwrap_or_else(|| "Not available".to_string()),
        account_created: date_or_unknown(user.created_at),
        last_sign_in: date_or_unknown(user.last_sign_in_at),
        edit_href: Route::Settings.path(),
    }
}
