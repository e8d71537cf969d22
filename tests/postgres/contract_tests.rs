//! Storage contracts run against the Diesel adapters.

use super::helpers::{TemporaryDatabase, database};
use crate::contracts::{delivery, transport};
use parcel_flow::{
    delivery::adapters::postgres::PostgresDeliveryTaskRepository,
    parcel::adapters::postgres::PostgresParcelRepository,
    transport::adapters::postgres::PostgresTransportTaskRepository,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_task_round_trips(database: Option<TemporaryDatabase>) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    transport::task_round_trips(&PostgresTransportTaskRepository::new(db.pool())).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_duplicate_binding_rejects_batch(
    database: Option<TemporaryDatabase>,
) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    transport::duplicate_binding_rejects_batch(
        &PostgresTransportTaskRepository::new(db.pool()),
        &PostgresParcelRepository::new(db.pool()),
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_driver_listing_filters_by_status(
    database: Option<TemporaryDatabase>,
) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    transport::driver_listing_filters_by_status(&PostgresTransportTaskRepository::new(db.pool()))
        .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_replace_drops_previous_set(
    database: Option<TemporaryDatabase>,
) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    delivery::replace_drops_previous_set(
        &PostgresDeliveryTaskRepository::new(db.pool()),
        &PostgresParcelRepository::new(db.pool()),
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_signature_round_trips(database: Option<TemporaryDatabase>) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    delivery::signature_round_trips(
        &PostgresDeliveryTaskRepository::new(db.pool()),
        &PostgresParcelRepository::new(db.pool()),
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_update_of_unknown_binding_fails(
    database: Option<TemporaryDatabase>,
) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    delivery::update_of_unknown_binding_fails(&PostgresDeliveryTaskRepository::new(db.pool()))
        .await
}
