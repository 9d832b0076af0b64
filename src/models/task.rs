//! Task-manager entries stored in the `tasks` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A task owned by one user. Tasks are created and deleted, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task text
    #[validate(length(min = 1, message = "task text is empty"))]
    pub task: String,
    /// Owning user's uid
    #[validate(length(min = 1, message = "task has no owner"))]
    pub uid: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(task: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            uid: uid.into(),
            created_at: Utc::now(),
        }
    }
}
