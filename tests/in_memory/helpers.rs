//! Shared helpers for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use parcel_flow::{
    delivery::{adapters::memory::InMemoryDeliveryTaskRepository, services::DeliveryCoordinator},
    parcel::{
        adapters::memory::{InMemoryParcelRepository, StaticGeocoder},
        domain::{Contact, Dimensions, GeoPoint, ParcelId, Region},
        services::{CreateParcelRequest, ParcelRegistry, SortingAbnormalRecorder},
    },
    transport::{adapters::memory::InMemoryTransportTaskRepository, services::TransportCoordinator},
};
use rstest::fixture;

/// Registry type shared by every coordinator in these tests.
pub type Registry = ParcelRegistry<InMemoryParcelRepository, DefaultClock>;

/// Every service of the chain wired to one parcel store.
pub struct Chain {
    pub registry: Registry,
    pub sorting: SortingAbnormalRecorder<InMemoryParcelRepository, DefaultClock>,
    pub transport: TransportCoordinator<
        InMemoryTransportTaskRepository,
        InMemoryParcelRepository,
        DefaultClock,
    >,
    pub delivery:
        DeliveryCoordinator<InMemoryDeliveryTaskRepository, InMemoryParcelRepository, DefaultClock>,
}

/// Provides a freshly wired chain for each test.
#[fixture]
pub fn chain() -> Chain {
    let geocoder = StaticGeocoder::new()
        .with_point("1 West Lake Rd, Hangzhou", GeoPoint::new(120.155, 30.274));
    let registry = ParcelRegistry::new(
        Arc::new(InMemoryParcelRepository::new()),
        Arc::new(DefaultClock),
    )
    .with_geocoder(Arc::new(geocoder));
    Chain {
        sorting: SortingAbnormalRecorder::new(registry.clone()),
        transport: TransportCoordinator::new(
            Arc::new(InMemoryTransportTaskRepository::new()),
            registry.clone(),
        ),
        delivery: DeliveryCoordinator::new(
            Arc::new(InMemoryDeliveryTaskRepository::new()),
            registry.clone(),
        ),
        registry,
    }
}

/// Builds a collection request for a Hangzhou to Shenzhen parcel.
///
/// # Panics
///
/// Panics if the fixed contact data fails validation.
#[must_use]
pub fn hangzhou_to_shenzhen(parcel_id: &str) -> CreateParcelRequest {
    CreateParcelRequest::new(
        Contact::new("Li Lei", "13800001111", "1 West Lake Rd, Hangzhou").expect("valid sender"),
        Contact::new("Han Meimei", "13987654321", "9 Nanshan Ave, Shenzhen")
            .expect("valid receiver"),
        Region::new("Guangdong", "Shenzhen", "Nanshan").expect("valid region"),
        Dimensions::weighing(2.0).expect("valid weight"),
    )
    .with_parcel_id(parcel_id)
    .collected_at("collector-7", "HZ Xihu Outlet", "1 West Lake Rd, Hangzhou")
}

/// Collects a parcel and sets it to `status` the way sorting does.
///
/// # Errors
///
/// Returns an error if collection or the status change fails.
pub async fn collect_with_status(
    registry: &Registry,
    parcel_id: &str,
    status: &str,
) -> eyre::Result<ParcelId> {
    let parcel = registry
        .create_parcel(hangzhou_to_shenzhen(parcel_id))
        .await?;
    registry.change_status(parcel.id(), status).await?;
    Ok(parcel.id().clone())
}

/// Converts string literals into owned tracking numbers.
#[must_use]
pub fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|id| (*id).to_owned()).collect()
}
