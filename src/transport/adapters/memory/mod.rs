//! In-memory adapters for the transport coordinator.

mod task;

pub use task::InMemoryTransportTaskRepository;
