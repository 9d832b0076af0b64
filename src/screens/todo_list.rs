//! Shared todo board, kept current by a live query over every todo.

use crate::db::{collections, Document, DocumentStore, Filter, Subscription};
use crate::error::AppError;
use crate::models::Todo;
use crate::screens::ScreenState;
use std::sync::Arc;

pub async fn subscribe_todos(store: &DocumentStore) -> Result<Subscription<Todo>, AppError> {
    store.subscribe(collections::TODOS, Filter::All).await
}

/// Add a todo. Blank text is ignored and returns `None`.
pub async fn add_todo(store: &DocumentStore, text: &str) -> Result<Option<String>, AppError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let id = store.create(collections::TODOS, &Todo::new(text)).await?;
    tracing::info!(todo_id = %id, "Todo added");
    Ok(Some(id))
}

pub async fn delete_todo(store: &DocumentStore, id: &str) -> Result<(), AppError> {
    store.delete(collections::TODOS, id).await?;
    tracing::info!(todo_id = %id, "Todo deleted");
    Ok(())
}

/// Latest snapshot of the board, oldest first.
pub struct TodoList {
    todos: ScreenState<Vec<Document<Todo>>>,
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoList {
    pub fn new() -> Self {
        Self {
            todos: ScreenState::Loading,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: Result<Arc<Vec<Document<Todo>>>, AppError>) {
        self.todos = match snapshot {
            Ok(todos) => {
                let mut todos = todos.as_ref().clone();
                todos.sort_by(|a, b| {
                    a.data
                        .created_at
                        .cmp(&b.data.created_at)
                        .then_with(|| a.id.cmp(&b.id))
                });
                ScreenState::Loaded(todos)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching todos");
                ScreenState::Failed(e.to_string())
            }
        };
    }

    pub fn view(&self) -> &ScreenState<Vec<Document<Todo>>> {
        &self.todos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_board_follows_adds_and_deletes() {
        let store = DocumentStore::in_memory();
        let mut sub = subscribe_todos(&store).await.unwrap();
        let mut list = TodoList::new();

        list.apply_snapshot(sub.next().await.unwrap());
        assert_eq!(list.view().as_loaded().map(Vec::len), Some(0));

        let id = add_todo(&store, "water plants").await.unwrap().unwrap();
        list.apply_snapshot(sub.next().await.unwrap());
        assert_eq!(list.view().as_loaded().unwrap()[0].data.text, "water plants");

        delete_todo(&store, &id).await.unwrap();
        list.apply_snapshot(sub.next().await.unwrap());
        assert_eq!(list.view().as_loaded().map(Vec::len), Some(0));

        sub.close().await;
    }

    #[tokio::test]
    async fn test_blank_todo_is_ignored() {
        let store = DocumentStore::in_memory();
        assert!(add_todo(&store, "   ").await.unwrap().is_none());
        let all = store
            .query::<Todo>(collections::TODOS, &Filter::All)
            .await
            .unwrap();
        assert!(all.is_empty());
    }
}
