//! `PostgreSQL` adapters for transport persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresTransportTaskRepository;
