//! `PostgreSQL` adapters for parcel persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresParcelRepository;
