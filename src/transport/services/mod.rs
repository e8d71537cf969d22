//! Application services for transport legs.

mod coordinator;

pub use coordinator::{
    CreateTransportTaskRequest, DEFAULT_BIND_BATCH_SIZE, TransportCoordinator,
    TransportCoordinatorError, TransportCoordinatorResult,
};
