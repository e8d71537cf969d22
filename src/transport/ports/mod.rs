//! Port contracts for the transport coordinator.

pub mod repository;

pub use repository::{TransportRepositoryError, TransportRepositoryResult, TransportTaskRepository};
