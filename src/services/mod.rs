// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend clients and session state.

pub mod auth;
pub mod identity_toolkit;
pub mod memory_auth;
pub mod preferences;
pub mod session;
pub mod uploads;

pub use auth::AuthService;
pub use identity_toolkit::IdentityToolkitClient;
pub use memory_auth::MemoryAuth;
pub use preferences::PreferenceStore;
pub use session::{spawn_session_listener, SessionContext};
pub use uploads::ImageUploader;
