//! Parcel fixtures shared by the unit tests of every context.

use std::sync::Arc;

use crate::parcel::{
    adapters::memory::InMemoryParcelRepository,
    domain::{Contact, Dimensions, ParcelId, ParcelStatus, ParcelStatusUpdate, Region},
    services::{CreateParcelRequest, ParcelRegistry},
};
use mockable::DefaultClock;

pub(crate) type TestRegistry = ParcelRegistry<InMemoryParcelRepository, DefaultClock>;

pub(crate) fn registry() -> TestRegistry {
    ParcelRegistry::new(
        Arc::new(InMemoryParcelRepository::new()),
        Arc::new(DefaultClock),
    )
}

pub(crate) fn create_request(parcel_id: &str) -> CreateParcelRequest {
    CreateParcelRequest::new(
        Contact::new("Li Lei", "13800001111", "1 West Lake Rd, Hangzhou").expect("valid sender"),
        Contact::new("Han Meimei", "13987654321", "9 Nanshan Ave, Shenzhen")
            .expect("valid receiver"),
        Region::new("Guangdong", "Shenzhen", "Nanshan").expect("valid region"),
        Dimensions::weighing(1.5).expect("valid weight"),
    )
    .with_parcel_id(parcel_id)
    .collected_at("collector-7", "HZ Xihu Outlet", "1 West Lake Rd, Hangzhou")
}

/// Registers a parcel and moves it to `status`.
pub(crate) async fn seed_parcel(
    registry: &TestRegistry,
    parcel_id: &str,
    status: ParcelStatus,
) -> ParcelId {
    let parcel = registry
        .create_parcel(create_request(parcel_id))
        .await
        .expect("parcel creation should succeed");
    if status != ParcelStatus::Collected {
        registry
            .update_status(parcel.id(), &ParcelStatusUpdate::new(status))
            .await
            .expect("status update should succeed");
    }
    parcel.id().clone()
}
