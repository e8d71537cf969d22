//! `PostgreSQL` adapters for delivery persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresDeliveryTaskRepository;
