// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Presentational view models.
//!
//! Pure functions of the data handed to them: no store access, no session
//! writes.

pub mod admin;
pub mod cards;
pub mod navbar;
pub mod profile;

pub use admin::{admin_dashboard, AdminDashboardView};
pub use cards::{login_card, profile_card, social_buttons, LoginCardView, SocialLink};
pub use navbar::{navbar, NavbarView};
pub use profile::{profile, ProfileView};
