pub mod generator;
pub mod ingest;
pub mod passengers;
pub mod stats;
pub mod todos;
