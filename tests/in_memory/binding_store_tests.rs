//! Storage contracts run against the in-memory adapters.

use crate::contracts::{delivery, transport};
use parcel_flow::{
    delivery::adapters::memory::InMemoryDeliveryTaskRepository,
    parcel::adapters::memory::InMemoryParcelRepository,
    transport::adapters::memory::InMemoryTransportTaskRepository,
};
use rstest::{fixture, rstest};

#[fixture]
fn parcels() -> InMemoryParcelRepository {
    InMemoryParcelRepository::new()
}

#[fixture]
fn transport_tasks() -> InMemoryTransportTaskRepository {
    InMemoryTransportTaskRepository::new()
}

#[fixture]
fn delivery_tasks() -> InMemoryDeliveryTaskRepository {
    InMemoryDeliveryTaskRepository::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_task_round_trips(
    transport_tasks: InMemoryTransportTaskRepository,
) -> eyre::Result<()> {
    transport::task_round_trips(&transport_tasks).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_duplicate_binding_rejects_batch(
    transport_tasks: InMemoryTransportTaskRepository,
    parcels: InMemoryParcelRepository,
) -> eyre::Result<()> {
    transport::duplicate_binding_rejects_batch(&transport_tasks, &parcels).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_driver_listing_filters_by_status(
    transport_tasks: InMemoryTransportTaskRepository,
) -> eyre::Result<()> {
    transport::driver_listing_filters_by_status(&transport_tasks).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_replace_drops_previous_set(
    delivery_tasks: InMemoryDeliveryTaskRepository,
    parcels: InMemoryParcelRepository,
) -> eyre::Result<()> {
    delivery::replace_drops_previous_set(&delivery_tasks, &parcels).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_signature_round_trips(
    delivery_tasks: InMemoryDeliveryTaskRepository,
    parcels: InMemoryParcelRepository,
) -> eyre::Result<()> {
    delivery::signature_round_trips(&delivery_tasks, &parcels).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_update_of_unknown_binding_fails(
    delivery_tasks: InMemoryDeliveryTaskRepository,
) -> eyre::Result<()> {
    delivery::update_of_unknown_binding_fails(&delivery_tasks).await
}
