//! CSV ingestion for passenger bulk loads.
//!
//! The format is deliberately plain: first line is a header (not checked),
//! one record per line, cells separated by `,` with no quoting.

use crate::db::models::{DEFAULT_STATUS, NewPassenger};
use std::collections::BTreeMap;

/// Column order of passenger CSV files.
pub const PASSENGER_COLUMNS: [&str; 15] = [
    "first_name",
    "last_name",
    "email",
    "phone",
    "passport_number",
    "nationality",
    "date_of_birth",
    "seat_number",
    "flight_number",
    "departure_city",
    "arrival_city",
    "departure_date",
    "ticket_class",
    "price",
    "status",
];

/// One parsed line keyed by column name. Columns past the end of the line are absent.
pub type CsvRow = BTreeMap<String, String>;

pub fn parse_csv(text: &str, columns: &[&str]) -> Vec<CsvRow> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split(',')
                .zip(columns)
                .map(|(cell, column)| (column.to_string(), cell.trim().to_string()))
                .collect()
        })
        .collect()
}

pub fn parse_passenger_csv(text: &str) -> Vec<NewPassenger> {
    parse_csv(text, &PASSENGER_COLUMNS)
        .iter()
        .map(passenger_from_row)
        .collect()
}

/// Nullable columns become `None` when absent or blank; required ones become `""`.
pub fn passenger_from_row(row: &CsvRow) -> NewPassenger {
    let required = |name: &str| row.get(name).cloned().unwrap_or_default();
    let optional = |name: &str| row.get(name).filter(|v| !v.is_empty()).cloned();

    NewPassenger {
        first_name: required("first_name"),
        last_name: required("last_name"),
        email: required("email"),
        phone: optional("phone"),
        passport_number: optional("passport_number"),
        nationality: optional("nationality"),
        date_of_birth: optional("date_of_birth"),
        seat_number: optional("seat_number"),
        flight_number: optional("flight_number"),
        departure_city: optional("departure_city"),
        arrival_city: optional("arrival_city"),
        departure_date: optional("departure_date"),
        ticket_class: optional("ticket_class"),
        price: optional("price"),
        status: optional("status").unwrap_or_else(|| DEFAULT_STATUS.to_string()),
    }
}

/// Flight number for the `index`-th (1-based) row of an import that carries none.
pub fn generated_flight_number(index: usize) -> String {
    format!("BR{index:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_skipped_and_positions_mapped() {
        let rows = parse_csv("a,b\nx,y\n", &["col1", "col2"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("col1").map(String::as_str), Some("x"));
        assert_eq!(rows[0].get("col2").map(String::as_str), Some("y"));
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let rows = parse_csv("a,b\r\n\r\nx,y\r\n   \nz,w", &["col1", "col2"]);
        let firsts: Vec<&str> = rows.iter().map(|r| r["col1"].as_str()).collect();
        assert_eq!(firsts, vec!["x", "z"]);
        assert_eq!(rows[0]["col2"], "y");
    }

    #[test]
    fn extra_cells_are_dropped_and_short_lines_leave_gaps() {
        let rows = parse_csv("h\n1,2,3\n4", &["col1", "col2"]);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
        assert!(!rows[1].contains_key("col2"));
    }

    #[test]
    fn header_only_input_yields_nothing() {
        let header_only = parse_csv("first_name,last_name", &PASSENGER_COLUMNS);
        assert!(header_only.is_empty());
        assert!(parse_csv("", &PASSENGER_COLUMNS).is_empty());
    }

    #[test]
    fn missing_columns_fill_with_none_or_empty() {
        let passengers = parse_passenger_csv("header\nAna,Silva\n");
        assert_eq!(passengers.len(), 1);
        let p = &passengers[0];
        assert_eq!(p.first_name, "Ana");
        assert_eq!(p.last_name, "Silva");
        assert_eq!(p.email, "");
        assert!(p.phone.is_none());
        assert!(p.flight_number.is_none());
        assert!(p.price.is_none());
        assert_eq!(p.status, DEFAULT_STATUS);
    }

    #[test]
    fn full_row_maps_every_column() {
        let csv = "h\nAna,Silva,ana@example.com,+351 900,P123,PT,1990-01-02,12A,\
                   TP100,Lisbon,Oslo,2025-06-01,business,420.50,checked-in";
        let p = &parse_passenger_csv(csv)[0];
        assert_eq!(p.seat_number.as_deref(), Some("12A"));
        assert_eq!(p.flight_number.as_deref(), Some("TP100"));
        assert_eq!(p.ticket_class.as_deref(), Some("business"));
        assert_eq!(p.price.as_deref(), Some("420.50"));
        assert_eq!(p.status, "checked-in");
    }

    #[test]
    fn flight_numbers_are_zero_padded() {
        assert_eq!(generated_flight_number(1), "BR0001");
        assert_eq!(generated_flight_number(42), "BR0042");
        assert_eq!(generated_flight_number(12345), "BR12345");
    }
}
