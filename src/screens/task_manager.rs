// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task manager: the signed-in user's tasks, fetched on demand.
//!
//! Unlike the notes dashboard there is no live query. The list is fetched
//! once on mount and again after every add or delete.

use crate::db::{collections, Document, DocumentStore, Filter};
use crate::error::AppError;
use crate::models::Task;
use serde::Serialize;

pub const NO_TASKS: &str = "No tasks found.";

pub struct TaskManager {
    store: DocumentStore,
    uid: String,
    tasks: Vec<Document<Task>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListView {
    pub tasks: Vec<Document<Task>>,
    pub empty_message: Option<&'static str>,
}

impl TaskManager {
    /// Fetch `uid`'s tasks.
    pub async fn load(store: DocumentStore, uid: impl Into<String>) -> Result<Self, AppError> {
        let mut manager = Self {
            store,
            uid: uid.into(),
            tasks: Vec::new(),
        };
        manager.refresh().await?;
        Ok(manager)
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let mut tasks = self
            .store
            .query::<Task>(collections::TASKS, &Filter::eq("uid", self.uid.as_str()))
            .await?;
        tasks.sort_by(|a, b| a.data.created_at.cmp(&b.data.created_at));
        self.tasks = tasks;
        Ok(())
    }

    pub fn tasks(&self) -> &[Document<Task>] {
        &self.tasks
    }

    /// Add a task. Blank text is ignored and returns `None`.
    pub async fn add(&mut self, text: &str) -> Result<Option<String>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let id = self
            .store
            .create(collections::TASKS, &Task::new(text, self.uid.as_str()))
            .await?;
        tracing::info!(task_id = %id, uid = %self.uid, "Task added");

        self.refresh().await?;
        Ok(Some(id))
    }

    /// Delete one of the user's tasks.
    pub async fn delete(&mut self, id: &str) -> Result<(), AppError> {
        let task = self
            .store
            .get::<Task>(collections::TASKS, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;
        if task.data.uid != self.uid {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this task".to_string(),
            ));
        }

        self.store.delete(collections::TASKS, id).await?;
        tracing::info!(task_id = %id, uid = %self.uid, "Task deleted");

        self.refresh().await
    }

    pub fn view(&self) -> TaskListView {
        TaskListView {
            tasks: self.tasks.clone(),
            empty_message: self.tasks.is_empty().then_some(NO_TASKS),
        }
    }
}
