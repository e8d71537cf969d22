//! Transport fixtures.

use std::sync::Arc;

use crate::parcel::{
    adapters::memory::InMemoryParcelRepository,
    tests::support::{TestRegistry, registry},
};
use crate::transport::{
    adapters::memory::InMemoryTransportTaskRepository,
    services::{CreateTransportTaskRequest, TransportCoordinator},
};
use mockable::DefaultClock;

pub(crate) type TestCoordinator =
    TransportCoordinator<InMemoryTransportTaskRepository, InMemoryParcelRepository, DefaultClock>;

/// A coordinator and the registry it updates, sharing one parcel store.
pub(crate) struct Harness {
    pub(crate) coordinator: TestCoordinator,
    pub(crate) parcels: TestRegistry,
}

pub(crate) fn harness() -> Harness {
    let parcels = registry();
    let coordinator = TransportCoordinator::new(
        Arc::new(InMemoryTransportTaskRepository::new()),
        parcels.clone(),
    );
    Harness {
        coordinator,
        parcels,
    }
}

pub(crate) fn hz_to_sz() -> CreateTransportTaskRequest {
    CreateTransportTaskRequest::new("HZ-Sort", "SZ-Sort", "V1").with_driver("driver-9", "Wang Wu")
}
