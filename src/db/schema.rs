//! SQL DDL for initializing the record store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `todos.completed` BOOLEAN (stored as INTEGER 0/1)
/// - `passengers` carrying the ticketed shape (seat, class, passport) and no `distance`
/// - `passengers.price` kept as TEXT; it is parsed only when aggregated
/// - `passengers.created_at` TEXT, RFC3339 when written by the service
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NULL,
    completed INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS passengers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NULL,
    passport_number TEXT NULL,
    nationality TEXT NULL,
    date_of_birth TEXT NULL,
    seat_number TEXT NULL,
    flight_number TEXT NULL,
    departure_city TEXT NULL,
    arrival_city TEXT NULL,
    departure_date TEXT NULL,
    ticket_class TEXT NULL,
    price TEXT NULL,
    status TEXT NOT NULL DEFAULT 'confirmed',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;
