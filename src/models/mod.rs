// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod note;
pub mod task;
pub mod todo;
pub mod user;

pub use note::{derive_title, Note, NoteFont};
pub use task::Task;
pub use todo::Todo;
pub use user::User;
