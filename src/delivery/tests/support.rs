//! Delivery fixtures.

use std::sync::Arc;

use crate::delivery::{
    adapters::memory::InMemoryDeliveryTaskRepository,
    services::{CreateDeliveryTaskRequest, DeliveryCoordinator, SignPackageRequest},
};
use crate::parcel::{
    adapters::memory::InMemoryParcelRepository,
    tests::support::{TestRegistry, registry},
};
use mockable::DefaultClock;

pub(crate) type TestCoordinator =
    DeliveryCoordinator<InMemoryDeliveryTaskRepository, InMemoryParcelRepository, DefaultClock>;

/// A coordinator and the registry it updates, sharing one parcel store.
pub(crate) struct Harness {
    pub(crate) coordinator: TestCoordinator,
    pub(crate) parcels: TestRegistry,
}

pub(crate) fn harness() -> Harness {
    let parcels = registry();
    let coordinator = DeliveryCoordinator::new(
        Arc::new(InMemoryDeliveryTaskRepository::new()),
        parcels.clone(),
    );
    Harness {
        coordinator,
        parcels,
    }
}

pub(crate) fn nanshan_round() -> CreateDeliveryTaskRequest {
    CreateDeliveryTaskRequest::new("Nanshan", "courier-3", "Zhao Liu", "SZ Nanshan Outlet")
}

pub(crate) fn signature(parcel_id: &str) -> SignPackageRequest {
    SignPackageRequest::new("courier-3", parcel_id, "Han Meimei", "13987654321", "person")
}
