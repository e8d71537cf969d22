//! Application services for delivery rounds.

mod coordinator;

pub use coordinator::{
    CreateDeliveryTaskRequest, DeliveryCoordinator, DeliveryCoordinatorError,
    DeliveryCoordinatorResult, SignPackageRequest,
};
