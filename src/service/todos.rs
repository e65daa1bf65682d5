use crate::db::{DbTodo, TodoStore};
use crate::error::DeskError;
use crate::service::generator::TitleGenerator;
use crate::types::tools::DeleteTodoResult;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct TodoOps {
    store: TodoStore,
    generator: Arc<dyn TitleGenerator>,
}

impl TodoOps {
    pub fn new(store: TodoStore, generator: Arc<dyn TitleGenerator>) -> Self {
        Self { store, generator }
    }

    pub async fn list_todos(&self) -> Result<Vec<DbTodo>, DeskError> {
        self.store.list().await
    }

    pub async fn generate_todo(&self) -> Result<DbTodo, DeskError> {
        let raw = self.generator.generate_title().await?;
        let title = clean_title(&raw);
        if title.is_empty() {
            return Err(DeskError::Generation(
                "text generator returned an empty title".to_string(),
            ));
        }
        let todo = self.store.insert(Some(&title), false).await?;
        info!(id = todo.id, title = %title, "generated todo");
        Ok(todo)
    }

    pub async fn toggle_todo(&self, id: i64) -> Result<DbTodo, DeskError> {
        let mut todo = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(DeskError::not_found("todo", id))?;
        todo.completed = !todo.completed;
        // Row vanished between read and write.
        if self.store.set_completed(id, todo.completed).await? == 0 {
            return Err(DeskError::not_found("todo", id));
        }
        Ok(todo)
    }

    pub async fn delete_todo(&self, id: i64) -> Result<DeleteTodoResult, DeskError> {
        if self.store.get_by_id(id).await?.is_none() {
            return Err(DeskError::not_found("todo", id));
        }
        if self.store.delete_by_id(id).await? == 0 {
            return Err(DeskError::not_found("todo", id));
        }
        info!(id, "deleted todo");
        Ok(DeleteTodoResult {
            success: true,
            deleted_id: id,
        })
    }
}

/// First non-blank line, without surrounding whitespace or quotes.
fn clean_title(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .to_string()
}
