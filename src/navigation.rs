// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client routes and session gating.
//!
//! Every screen has a route. Routes are public, guest-only (the auth forms)
//! or require a signed-in session; [`gate`] answers where a visitor ends up.

use serde::Serialize;

/// A client route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    PasswordReset,
    Notes,
    Note(String),
    NewNote,
    Profile,
    Settings,
    PublicNote(String),
    Tasks,
    Todos,
    Dashboard,
}

/// Who may visit a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    Public,
    /// Only reachable while signed out
    GuestOnly,
    SignedIn,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::SignIn => "/signin".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::PasswordReset => "/password-reset".to_string(),
            Route::Notes => "/notes".to_string(),
            Route::Note(id) => format!("/note/{}", id),
            Route::NewNote => "/new-note".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::PublicNote(id) => format!("/view/note/{}", id),
            Route::Tasks => "/tasks".to_string(),
            Route::Todos => "/todos".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
        }
    }

    /// Match a request path. Unknown paths return `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            ["signin"] => Some(Route::SignIn),
            ["signup"] => Some(Route::SignUp),
            ["password-reset"] => Some(Route::PasswordReset),
            ["notes"] => Some(Route::Notes),
            ["note", id] if !id.is_empty() => Some(Route::Note(id.to_string())),
            ["new-note"] => Some(Route::NewNote),
            ["profile"] => Some(Route::Profile),
            ["settings"] => Some(Route::Settings),
            ["view", "note", id] if !id.is_empty() => Some(Route::PublicNote(id.to_string())),
            ["tasks"] => Some(Route::Tasks),
            ["todos"] => Some(Route::Todos),
            ["dashboard"] => Some(Route::Dashboard),
            _ => None,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::SignIn | Route::SignUp | Route::PasswordReset => Access::GuestOnly,
            Route::PublicNote(_) | Route::Todos | Route::Dashboard => Access::Public,
            Route::Notes
            | Route::Note(_)
            | Route::NewNote
            | Route::Profile
            | Route::Settings
            | Route::Tasks => Access::SignedIn,
        }
    }
}

/// Where an unknown path (and `/`) sends the visitor.
pub fn landing(signed_in: bool) -> Route {
    if signed_in {
        Route::Notes
    } else {
        Route::SignIn
    }
}

/// Decide whether a visitor may see `route`.
///
/// Returns the redirect target when they may not: signed-out visitors go to
/// sign-in, signed-in visitors on the auth forms go to their notes.
pub fn gate(route: &Route, signed_in: bool) -> Result<(), Route> {
    match (route.access(), signed_in) {
        (Access::SignedIn, false) => Err(Route::SignIn),
        (Access::GuestOnly, true) => Err(Route::Notes),
        _ => Ok(()),
    }
}
