// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (session gating, security headers).

pub mod auth;
pub mod security;

pub use auth::{redirect_signed_in, require_session, SessionUser};
