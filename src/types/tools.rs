//! Request and response payloads of the remote tools.
//!
//! Inputs reject unknown fields so a misspelled filter fails loudly instead of
//! silently widening a query.

use crate::db::{DbPassenger, DbTodo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input of tools that take no arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoInput {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoIdInput {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PassengerFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CsvImportInput {
    pub csv_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<DbTodo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoEnvelope {
    pub todo: DbTodo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTodoResult {
    pub success: bool,
    pub deleted_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerList {
    pub passengers: Vec<DbPassenger>,
    pub total_count: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerStats {
    pub total_passengers: usize,
    pub by_ticket_class: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
    pub by_flight: BTreeMap<String, u64>,
    pub average_price: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub imported_count: usize,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResult {
    pub success: bool,
    pub deleted_count: u64,
    pub message: String,
}
