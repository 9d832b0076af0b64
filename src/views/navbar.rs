//! Top navigation bar.

use crate::models::User;
use crate::navigation::Route;
use serde::Serialize;

pub const BRAND: &str = "NotesApp";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavUser {
    /// Email local part, or `User`
    pub handle: String,
    /// Display name, falling back to the handle
    pub name: String,
    pub email: String,
    pub initial: char,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavbarView {
    pub brand: &'static str,
    pub home: String,
    pub links: Vec<NavLink>,
    pub user: Option<NavUser>,
    pub dark_mode: bool,
    /// Label of the appearance toggle, naming the mode it switches to
    pub theme_toggle_label: &'static str,
    pub show_sign_out: bool,
}

pub fn navbar(user: Option<&User>, dark_mode: bool) -> NavbarView {
    let links = match user {
        Some(_) => vec![
            NavLink {
                label: "Profile",
                href: Route::Profile.path(),
            },
            NavLink {
                label: "Settings",
                href: Route::Settings.path(),
            },
        ],
        None => Vec::new(),
    };

    let user = user.map(|u| {
        let handle = u
            .email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .unwrap_or("User")
            .to_string();
        NavUser {
            name: u.label(),
            email: u.email.clone().unwrap_or_else(|| "No email".to_string()),
            initial: u.initial(),
            handle,
        }
    });

    NavbarView {
        brand: BRAND,
        home: "/".to_string(),
        show_sign_out: user.is_some(),
        links,
        user,
        dark_mode,
        theme_toggle_label: if dark_mode { "Light Mode" } else { "Dark Mode" },
    }
}
