//! Catalog of remote tools: names and JSON input schemas.

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use crate::error::DeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetUser,
    ListTodos,
    GenerateTodoWithAi,
    ToggleTodo,
    DeleteTodo,
    GetPassengers,
    GetPassengerStats,
    ImportPassengersFromCsv,
    ClearDatabase,
    PopulateTestData,
}

impl ToolName {
    pub const ALL: [ToolName; 10] = [
        ToolName::GetUser,
        ToolName::ListTodos,
        ToolName::GenerateTodoWithAi,
        ToolName::ToggleTodo,
        ToolName::DeleteTodo,
        ToolName::GetPassengers,
        ToolName::GetPassengerStats,
        ToolName::ImportPassengersFromCsv,
        ToolName::ClearDatabase,
        ToolName::PopulateTestData,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetUser => "GET_USER",
            ToolName::ListTodos => "LIST_TODOS",
            ToolName::GenerateTodoWithAi => "GENERATE_TODO_WITH_AI",
            ToolName::ToggleTodo => "TOGGLE_TODO",
            ToolName::DeleteTodo => "DELETE_TODO",
            ToolName::GetPassengers => "GET_PASSENGERS",
            ToolName::GetPassengerStats => "GET_PASSENGER_STATS",
            ToolName::ImportPassengersFromCsv => "IMPORT_PASSENGERS_FROM_CSV",
            ToolName::ClearDatabase => "CLEAR_DATABASE",
            ToolName::PopulateTestData => "POPULATE_TEST_DATA",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolName::GetUser => "Profile of the authenticated caller",
            ToolName::ListTodos => "All todos",
            ToolName::GenerateTodoWithAi => "Create a todo with a generated title",
            ToolName::ToggleTodo => "Flip a todo's completed flag",
            ToolName::DeleteTodo => "Delete a todo by id",
            ToolName::GetPassengers => "Passengers matching equality filters, optionally capped",
            ToolName::GetPassengerStats => "Passenger counts per group plus average price",
            ToolName::ImportPassengersFromCsv => "Insert passengers parsed from CSV text",
            ToolName::ClearDatabase => "Delete every passenger",
            ToolName::PopulateTestData => "Load the sample passengers into an empty table",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            ToolName::ToggleTodo | ToolName::DeleteTodo => json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "Todo id" }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            ToolName::GetPassengers => {
                let text = json!({ "type": "string" });
                json!({
                    "type": "object",
                    "properties": {
                        "flightNumber": text,
                        "departureCity": text,
                        "arrivalCity": text,
                        "ticketClass": text,
                        "status": text,
                        "limit": {
                            "type": "integer",
                            "minimum": 0,
                            "description": "Maximum rows returned; 0 or absent means no cap"
                        }
                    },
                    "additionalProperties": false
                })
            }
            ToolName::ImportPassengersFromCsv => json!({
                "type": "object",
                "properties": {
                    "csvContent": {
                        "type": "string",
                        "description": "Header line followed by comma separated passenger rows"
                    }
                },
                "required": ["csvContent"],
                "additionalProperties": false
            }),
            _ => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DeskError::UnknownTool(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn catalog() -> Vec<ToolDescriptor> {
    ToolName::ALL
        .into_iter()
        .map(|t| ToolDescriptor {
            name: t.as_str(),
            description: t.description(),
            input_schema: t.input_schema(),
        })
        .collect()
}
