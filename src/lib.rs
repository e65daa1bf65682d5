pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod tools;
pub mod types;

pub use client::DeskClient;
pub use error::DeskError;
pub use router::{DeskState, desk_router};
