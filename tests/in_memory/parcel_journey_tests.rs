//! A parcel carried from collection through transport to a signature.

use super::helpers::{Chain, chain, collect_with_status, ids};
use eyre::{bail, ensure};
use parcel_flow::{
    common::{AbnormalReport, ErrorKind},
    delivery::{
        domain::DeliveryStatus,
        services::{CreateDeliveryTaskRequest, SignPackageRequest},
    },
    parcel::domain::{GeoPoint, NodeType, ParcelStatus},
    transport::{domain::TransportStatus, services::CreateTransportTaskRequest},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn parcel_follows_its_tasks_until_signed(chain: Chain) -> eyre::Result<()> {
    let parcel_id = collect_with_status(&chain.registry, "KD-J-0001", "sorted").await?;

    let leg = chain
        .transport
        .create_task(
            CreateTransportTaskRequest::new("HZ-Sort", "SZ-Sort", "V1")
                .with_driver("driver-9", "Wang Wu"),
        )
        .await?;
    chain
        .transport
        .bind_packages(leg.id(), &ids(&["KD-J-0001"]))
        .await?;
    chain.transport.change_status(leg.id(), "transporting").await?;
    ensure!(chain.registry.get(&parcel_id).await?.status() == ParcelStatus::Transporting);
    chain.transport.change_status(leg.id(), "arrived").await?;
    let finished = chain.transport.change_status(leg.id(), "completed").await?;
    ensure!(finished.value().status() == TransportStatus::Completed);
    ensure!(chain.registry.get(&parcel_id).await?.status() == ParcelStatus::Arrived);

    let round = chain
        .delivery
        .create_task(CreateDeliveryTaskRequest::new(
            "Nanshan",
            "courier-3",
            "Zhao Liu",
            "SZ Nanshan Outlet",
        ))
        .await?;
    chain
        .delivery
        .bind_packages(round.id(), &ids(&["KD-J-0001"]))
        .await?;
    chain.delivery.change_status(round.id(), "delivering").await?;
    ensure!(chain.registry.get(&parcel_id).await?.status() == ParcelStatus::Delivering);
    chain
        .delivery
        .sign_package(
            round.id(),
            SignPackageRequest::new(
                "courier-3",
                "KD-J-0001",
                "Han Meimei",
                "13987654321",
                "person",
            ),
        )
        .await?;
    let closed = chain.delivery.change_status(round.id(), "completed").await?;

    ensure!(closed.value().status() == DeliveryStatus::Completed);
    ensure!(chain.registry.get(&parcel_id).await?.status() == ParcelStatus::Delivered);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn collection_trace_carries_geocoded_location(chain: Chain) -> eyre::Result<()> {
    let parcel_id = collect_with_status(&chain.registry, "KD-J-0002", "collected").await?;

    let details = chain.registry.parcel_detail(&parcel_id).await?;

    let [trace] = details.traces() else {
        bail!("expected only the collection trace");
    };
    ensure!(trace.node_type() == NodeType::Collection);
    ensure!(trace.location() == GeoPoint::new(120.155, 30.274));
    ensure!(details.current_position() == Some("HZ Xihu Outlet"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transport_rejects_a_direct_jump_to_delivered(chain: Chain) -> eyre::Result<()> {
    collect_with_status(&chain.registry, "KD-J-0003", "sorted").await?;
    let leg = chain
        .transport
        .create_task(CreateTransportTaskRequest::new("HZ-Sort", "SZ-Sort", "V1"))
        .await?;
    chain
        .transport
        .bind_packages(leg.id(), &ids(&["KD-J-0003"]))
        .await?;
    chain.transport.change_status(leg.id(), "transporting").await?;

    let Err(err) = chain.transport.change_status(leg.id(), "delivered").await else {
        bail!("delivered is not a transport status");
    };

    ensure!(err.kind() == ErrorKind::InvalidTransition);
    ensure!(chain.transport.get_task(leg.id()).await?.status() == TransportStatus::Transporting);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delivery_cannot_bind_parcels_still_in_transit(chain: Chain) -> eyre::Result<()> {
    collect_with_status(&chain.registry, "KD-J-0004", "transporting").await?;
    let round = chain
        .delivery
        .create_task(CreateDeliveryTaskRequest::new(
            "Futian",
            "courier-5",
            "",
            "SZ Futian Outlet",
        ))
        .await?;

    let Err(err) = chain
        .delivery
        .bind_packages(round.id(), &ids(&["KD-J-0004"]))
        .await
    else {
        bail!("transporting parcel should not join a delivery round");
    };

    ensure!(err.kind() == ErrorKind::InvalidBinding);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replaying_a_report_retries_only_failures(chain: Chain) -> eyre::Result<()> {
    let kept = collect_with_status(&chain.registry, "KD-J-0005", "sorted").await?;
    let archived = collect_with_status(&chain.registry, "KD-J-0006", "sorted").await?;
    let leg = chain
        .transport
        .create_task(CreateTransportTaskRequest::new("HZ-Sort", "SZ-Sort", "V2"))
        .await?;
    chain
        .transport
        .bind_packages(leg.id(), &ids(&["KD-J-0005", "KD-J-0006"]))
        .await?;
    chain.registry.archive(&archived).await?;

    let outcome = chain
        .transport
        .report_abnormal(
            leg.id(),
            AbnormalReport::new("traffic", "road closed", "dispatcher-2"),
        )
        .await?;
    ensure!(outcome.report().failures().len() == 1);
    ensure!(chain.registry.get(&kept).await?.status() == ParcelStatus::TransportAbnormal);

    let replayed = chain.registry.replay(outcome.report()).await;

    ensure!(replayed.updated().is_empty());
    let [failure] = replayed.failures() else {
        bail!("archived parcel should fail again");
    };
    ensure!(failure.parcel_id() == &archived);
    Ok(())
}
