use axum::{Json, extract::State};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::DeskError;
use crate::middleware::tool_request::{ToolCall, ToolPreprocess};
use crate::router::DeskState;
use crate::tools::{ToolDescriptor, ToolName, catalog};
use crate::types::tools::{
    CsvImportInput, NoInput, PassengerFilters, TodoEnvelope, TodoIdInput, TodoList,
};

/// POST /tools/{name}
pub async fn tool_handler(
    State(state): State<DeskState>,
    ToolPreprocess(call): ToolPreprocess,
) -> Result<Json<Value>, DeskError> {
    let name = call.name;
    debug!(tool = %name, "tool call received");
    let output = dispatch(&state, call).await?;
    info!(tool = %name, "tool call completed");
    Ok(Json(output))
}

/// GET /tools
pub async fn list_tools_handler() -> Json<Vec<ToolDescriptor>> {
    Json(catalog())
}

pub async fn dispatch(state: &DeskState, call: ToolCall) -> Result<Value, DeskError> {
    let ToolCall {
        name,
        caller,
        input,
    } = call;
    match name {
        ToolName::GetUser => {
            parse_input::<NoInput>(input)?;
            respond(caller.resolve()?)
        }
        ToolName::ListTodos => {
            parse_input::<NoInput>(input)?;
            let todos = state.todos.list_todos().await?;
            respond(TodoList { todos })
        }
        ToolName::GenerateTodoWithAi => {
            parse_input::<NoInput>(input)?;
            let todo = state.todos.generate_todo().await?;
            respond(TodoEnvelope { todo })
        }
        ToolName::ToggleTodo => {
            let TodoIdInput { id } = parse_input(input)?;
            let todo = state.todos.toggle_todo(id).await?;
            respond(TodoEnvelope { todo })
        }
        ToolName::DeleteTodo => {
            let TodoIdInput { id } = parse_input(input)?;
            respond(state.todos.delete_todo(id).await?)
        }
        ToolName::GetPassengers => {
            let filters: PassengerFilters = parse_input(input)?;
            respond(state.passengers.get_passengers(filters).await?)
        }
        ToolName::GetPassengerStats => {
            parse_input::<NoInput>(input)?;
            respond(state.passengers.get_passenger_stats().await?)
        }
        ToolName::ImportPassengersFromCsv => {
            let CsvImportInput { csv_content } = parse_input(input)?;
            respond(
                state
                    .passengers
                    .import_passengers_from_csv(&csv_content)
                    .await?,
            )
        }
        ToolName::ClearDatabase => {
            parse_input::<NoInput>(input)?;
            respond(state.passengers.clear_database().await?)
        }
        ToolName::PopulateTestData => {
            parse_input::<NoInput>(input)?;
            respond(state.passengers.populate_test_data().await?)
        }
    }
}

/// Missing input is treated as `{}`.
fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T, DeskError> {
    let input = match input {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(input).map_err(|e| DeskError::InvalidInput(e.to_string()))
}

fn respond<T: Serialize>(output: T) -> Result<Value, DeskError> {
    Ok(serde_json::to_value(output)?)
}
