//! Passenger selection built as a value, evaluated by [`PassengerStore`].
//!
//! Evaluation currently loads every row and filters in memory; the query
//! carries column names so a store can translate it into a `WHERE` clause
//! without callers noticing.
//!
//! [`PassengerStore`]: crate::db::sqlite::PassengerStore

use crate::db::models::DbPassenger;
use std::fmt;

/// Passenger columns that accept equality filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerField {
    FlightNumber,
    DepartureCity,
    ArrivalCity,
    TicketClass,
    Status,
}

impl PassengerField {
    pub fn column(self) -> &'static str {
        match self {
            Self::FlightNumber => "flight_number",
            Self::DepartureCity => "departure_city",
            Self::ArrivalCity => "arrival_city",
            Self::TicketClass => "ticket_class",
            Self::Status => "status",
        }
    }

    /// Wire (camelCase) name, used in summaries.
    pub fn label(self) -> &'static str {
        match self {
            Self::FlightNumber => "flightNumber",
            Self::DepartureCity => "departureCity",
            Self::ArrivalCity => "arrivalCity",
            Self::TicketClass => "ticketClass",
            Self::Status => "status",
        }
    }

    fn value(self, passenger: &DbPassenger) -> Option<&str> {
        match self {
            Self::FlightNumber => passenger.flight_number.as_deref(),
            Self::DepartureCity => passenger.departure_city.as_deref(),
            Self::ArrivalCity => passenger.arrival_city.as_deref(),
            Self::TicketClass => passenger.ticket_class.as_deref(),
            Self::Status => Some(passenger.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassengerQuery {
    filters: Vec<(PassengerField, String)>,
    limit: Option<usize>,
}

/// Rows selected by a query plus how many matched before the limit applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub rows: Vec<DbPassenger>,
    pub matched: usize,
}

impl PassengerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality constraint. Blank values constrain nothing.
    pub fn with_filter(mut self, field: PassengerField, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.filters.push((field, value));
        }
        self
    }

    pub fn with_optional_filter(self, field: PassengerField, value: Option<String>) -> Self {
        match value {
            Some(v) => self.with_filter(field, v),
            None => self,
        }
    }

    /// Caps the result count; 0 means unlimited.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn filters(&self) -> &[(PassengerField, String)] {
        &self.filters
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn matches(&self, passenger: &DbPassenger) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| field.value(passenger) == Some(expected.as_str()))
    }

    pub fn apply(&self, rows: Vec<DbPassenger>) -> Selection {
        let mut rows: Vec<DbPassenger> = rows.into_iter().filter(|p| self.matches(p)).collect();
        let matched = rows.len();
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        Selection { rows, matched }
    }
}

impl fmt::Display for PassengerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filters.is_empty() {
            return f.write_str("no filters");
        }
        let parts: Vec<String> = self
            .filters
            .iter()
            .map(|(field, value)| format!("{}={}", field.label(), value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
