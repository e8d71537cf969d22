//! Port contracts for the delivery coordinator.

pub mod repository;

pub use repository::{DeliveryRepositoryError, DeliveryRepositoryResult, DeliveryTaskRepository};
