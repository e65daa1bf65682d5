//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `query.rs`: passenger selection values evaluated by the store
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool setup and the per-table stores

pub mod models;
pub mod query;
pub mod schema;
pub mod sqlite;

pub use models::{DbPassenger, DbTodo, NewPassenger};
pub use query::{PassengerField, PassengerQuery, Selection};
pub use schema::SQLITE_INIT;
pub use sqlite::{PassengerStore, SqlitePool, TodoStore, connect};
