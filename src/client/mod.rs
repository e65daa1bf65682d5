//! Typed caller for a running desk server, plus plain-text rendering.

pub mod render;

use crate::db::DbTodo;
use crate::error::{ApiErrorResponse, DeskError};
use crate::middleware::auth::DESK_KEY_HEADER;
use crate::middleware::identity::USER_CONTEXT_HEADER;
use crate::tools::ToolName;
use crate::types::tools::{
    ClearResult, CsvImportInput, DeleteTodoResult, ImportResult, NoInput, PassengerFilters,
    PassengerList, PassengerStats, TodoEnvelope, TodoIdInput, TodoList, UserProfile,
};
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;
use url::Url;

#[derive(Clone)]
pub struct DeskClient {
    http: reqwest::Client,
    base: Url,
    key: String,
    user_context: Option<String>,
}

impl DeskClient {
    pub fn new(http: reqwest::Client, base: Url, key: impl Into<String>) -> Self {
        Self {
            http,
            base,
            key: key.into(),
            user_context: None,
        }
    }

    /// Forward an identity context as the fronting identity provider would.
    pub fn with_user_context(mut self, context: impl Into<String>) -> Self {
        self.user_context = Some(context.into());
        self
    }

    /// Invoke `tool` with an arbitrary JSON input.
    pub async fn call_raw(&self, tool: ToolName, input: &Value) -> Result<Value, DeskError> {
        self.call(tool, input).await
    }

    async fn call<I, O>(&self, tool: ToolName, input: &I) -> Result<O, DeskError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.base.join(&format!("tools/{}", tool.as_str()))?;
        let mut req = self
            .http
            .post(url)
            .header(DESK_KEY_HEADER, self.key.as_str())
            .json(input);
        if let Some(ctx) = self.user_context.as_deref() {
            req = req.header(USER_CONTEXT_HEADER, ctx);
        }

        let resp = req.send().await?;
        let status = resp.status();
        debug!(tool = %tool, %status, "tool response");
        if status.is_success() {
            return Ok(resp.json::<O>().await?);
        }

        let body = resp.bytes().await?;
        Err(remote_error(status, &body))
    }

    pub async fn get_user(&self) -> Result<UserProfile, DeskError> {
        self.call(ToolName::GetUser, &NoInput {}).await
    }

    pub async fn list_todos(&self) -> Result<Vec<DbTodo>, DeskError> {
        let list: TodoList = self.call(ToolName::ListTodos, &NoInput {}).await?;
        Ok(list.todos)
    }

    pub async fn generate_todo(&self) -> Result<DbTodo, DeskError> {
        let env: TodoEnvelope = self.call(ToolName::GenerateTodoWithAi, &NoInput {}).await?;
        Ok(env.todo)
    }

    pub async fn toggle_todo(&self, id: i64) -> Result<DbTodo, DeskError> {
        let env: TodoEnvelope = self.call(ToolName::ToggleTodo, &TodoIdInput { id }).await?;
        Ok(env.todo)
    }

    pub async fn delete_todo(&self, id: i64) -> Result<DeleteTodoResult, DeskError> {
        self.call(ToolName::DeleteTodo, &TodoIdInput { id }).await
    }

    pub async fn get_passengers(
        &self,
        filters: &PassengerFilters,
    ) -> Result<PassengerList, DeskError> {
        self.call(ToolName::GetPassengers, filters).await
    }

    pub async fn get_passenger_stats(&self) -> Result<PassengerStats, DeskError> {
        self.call(ToolName::GetPassengerStats, &NoInput {}).await
    }

    pub async fn import_passengers_from_csv(
        &self,
        csv_content: impl Into<String>,
    ) -> Result<ImportResult, DeskError> {
        let input = CsvImportInput {
            csv_content: csv_content.into(),
        };
        self.call(ToolName::ImportPassengersFromCsv, &input).await
    }

    pub async fn clear_database(&self) -> Result<ClearResult, DeskError> {
        self.call(ToolName::ClearDatabase, &NoInput {}).await
    }

    pub async fn populate_test_data(&self) -> Result<ImportResult, DeskError> {
        self.call(ToolName::PopulateTestData, &NoInput {}).await
    }
}

/// Non-success reply from the desk server. Bodies that are not an error
/// envelope (a proxy page, a wrong base URL) still surface as `Remote`.
fn remote_error(status: StatusCode, body: &[u8]) -> DeskError {
    if let Ok(envelope) = serde_json::from_slice::<ApiErrorResponse>(body) {
        return DeskError::Remote {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        };
    }
    let text = String::from_utf8_lossy(body);
    let reason = status.canonical_reason().unwrap_or("empty body");
    let message = match text.trim() {
        "" => reason.to_string(),
        t => t.chars().take(200).collect(),
    };
    DeskError::Remote {
        status,
        code: "REMOTE_ERROR".to_string(),
        message,
    }
}
