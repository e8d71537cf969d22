//! Registry and coordinators wired to the Diesel adapters.

use std::sync::Arc;

use super::helpers::{TemporaryDatabase, database};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use parcel_flow::{
    common::AbnormalReport,
    delivery::{
        adapters::postgres::PostgresDeliveryTaskRepository,
        services::{CreateDeliveryTaskRequest, DeliveryCoordinator, SignPackageRequest},
    },
    parcel::{
        adapters::postgres::PostgresParcelRepository,
        domain::{AbnormalRecordStatus, Contact, Dimensions, NodeType, ParcelStatus, Region},
        services::{CreateParcelRequest, ParcelRegistry, SortingAbnormalRecorder},
    },
    transport::{
        adapters::postgres::PostgresTransportTaskRepository,
        services::{CreateTransportTaskRequest, TransportCoordinator},
    },
};
use rstest::rstest;

type Registry = ParcelRegistry<PostgresParcelRepository, DefaultClock>;

fn registry(db: &TemporaryDatabase) -> Registry {
    ParcelRegistry::new(
        Arc::new(PostgresParcelRepository::new(db.pool())),
        Arc::new(DefaultClock),
    )
}

fn request(parcel_id: &str) -> eyre::Result<CreateParcelRequest> {
    Ok(CreateParcelRequest::new(
        Contact::new("Li Lei", "13800001111", "1 West Lake Rd, Hangzhou")?,
        Contact::new("Han Meimei", "13987654321", "9 Nanshan Ave, Shenzhen")?,
        Region::new("Guangdong", "Shenzhen", "Nanshan")?,
        Dimensions::weighing(3.2)?,
    )
    .with_parcel_id(parcel_id)
    .collected_at("collector-7", "HZ Xihu Outlet", "1 West Lake Rd, Hangzhou"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn collected_parcel_persists_with_trace(
    database: Option<TemporaryDatabase>,
) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    let parcels = registry(&db);

    let created = parcels.create_parcel(request("KD-PG-0001")?).await?;
    let details = parcels.parcel_detail(created.id()).await?;

    ensure!(details.parcel().id() == created.id());
    ensure!(details.parcel().receiver() == created.receiver());
    let [trace] = details.traces() else {
        bail!("expected the collection trace");
    };
    ensure!(trace.node_type() == NodeType::Collection);
    ensure!(trace.location().is_unknown());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archived_parcel_is_hidden(database: Option<TemporaryDatabase>) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    let parcels = registry(&db);
    let created = parcels.create_parcel(request("KD-PG-0002")?).await?;

    parcels.archive(created.id()).await?;

    ensure!(parcels.find(created.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sorting_abnormal_record_persists(database: Option<TemporaryDatabase>) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    let parcels = registry(&db);
    let created = parcels.create_parcel(request("KD-PG-0003")?).await?;
    let sorting = SortingAbnormalRecorder::new(parcels.clone());

    let outcome = sorting
        .handle_sorting_abnormal(created.id(), "crushed box", "sorter-2")
        .await?;
    let resolved = sorting
        .resolve(outcome.record().id(), "repacked", "supervisor-1")
        .await?;

    let records = sorting.records_for(created.id()).await?;
    let [stored] = records.as_slice() else {
        bail!("expected one abnormal record");
    };
    ensure!(stored.id() == resolved.id());
    ensure!(stored.status() == AbnormalRecordStatus::Resolved);
    ensure!(stored.processing_method() == Some("repacked"));
    ensure!(parcels.get(created.id()).await?.status() == ParcelStatus::Abnormal);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_propagate_through_postgres(database: Option<TemporaryDatabase>) -> eyre::Result<()> {
    let Some(db) = database else {
        return Ok(());
    };
    let parcels = registry(&db);
    let created = parcels.create_parcel(request("KD-PG-0004")?).await?;
    parcels.change_status(created.id(), "sorted").await?;
    let transport = TransportCoordinator::new(
        Arc::new(PostgresTransportTaskRepository::new(db.pool())),
        parcels.clone(),
    );
    let delivery = DeliveryCoordinator::new(
        Arc::new(PostgresDeliveryTaskRepository::new(db.pool())),
        parcels.clone(),
    );
    let bound = vec!["KD-PG-0004".to_owned()];

    let leg = transport
        .create_task(CreateTransportTaskRequest::new("HZ-Sort", "SZ-Sort", "V1"))
        .await?;
    transport.bind_packages(leg.id(), &bound).await?;
    transport.change_status(leg.id(), "transporting").await?;
    transport
        .report_abnormal(
            leg.id(),
            AbnormalReport::new("vehicle_fault", "flat tyre", "dispatcher-1"),
        )
        .await?;
    ensure!(parcels.get(created.id()).await?.status() == ParcelStatus::TransportAbnormal);
    transport
        .handle_abnormal(leg.id(), "tyre replaced", "transporting")
        .await?;
    transport.change_status(leg.id(), "arrived").await?;

    let round = delivery
        .create_task(CreateDeliveryTaskRequest::new(
            "Nanshan",
            "courier-3",
            "Zhao Liu",
            "SZ Nanshan Outlet",
        ))
        .await?;
    delivery.bind_packages(round.id(), &bound).await?;
    delivery.change_status(round.id(), "delivering").await?;
    delivery
        .sign_package(
            round.id(),
            SignPackageRequest::new(
                "courier-3",
                "KD-PG-0004",
                "Han Meimei",
                "13987654321",
                "person",
            ),
        )
        .await?;
    let closed = delivery.change_status(round.id(), "completed").await?;

    ensure!(closed.report().is_complete());
    ensure!(parcels.get(created.id()).await?.status() == ParcelStatus::Delivered);
    Ok(())
}
