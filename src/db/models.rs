use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status given to passengers imported without one.
pub const DEFAULT_STATUS: &str = "confirmed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DbTodo {
    pub id: i64,
    pub title: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DbPassenger {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub seat_number: Option<String>,
    pub flight_number: Option<String>,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departure_date: Option<String>,
    pub ticket_class: Option<String>,
    pub price: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for one passenger row; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPassenger {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub passport_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<String>,
    pub seat_number: Option<String>,
    pub flight_number: Option<String>,
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departure_date: Option<String>,
    pub ticket_class: Option<String>,
    pub price: Option<String>,
    pub status: String,
}
