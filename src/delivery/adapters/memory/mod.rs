//! In-memory adapters for the delivery coordinator.

mod task;

pub use task::InMemoryDeliveryTaskRepository;
