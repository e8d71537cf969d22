//! Sorting abnormal events raised against parcels.

use super::helpers::{Chain, chain, collect_with_status};
use eyre::{bail, ensure};
use parcel_flow::parcel::domain::{AbnormalRecordStatus, NodeType, ParcelStatus};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sorting_abnormal_flags_parcel_and_opens_record(chain: Chain) -> eyre::Result<()> {
    let parcel_id = collect_with_status(&chain.registry, "KD-S-0101", "sorted").await?;

    let outcome = chain
        .sorting
        .handle_sorting_abnormal(&parcel_id, "damaged label", "sorter-4")
        .await?;

    let parcel = chain.registry.get(&parcel_id).await?;
    ensure!(parcel.status() == ParcelStatus::Abnormal);
    ensure!(parcel.abnormal_reason() == Some("damaged label"));
    ensure!(outcome.record().status() == AbnormalRecordStatus::Pending);
    ensure!(outcome.trace().node_type() == NodeType::Abnormal);
    ensure!(chain.registry.parcel_detail(&parcel_id).await?.traces().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resolving_a_record_closes_it_once(chain: Chain) -> eyre::Result<()> {
    let parcel_id = collect_with_status(&chain.registry, "KD-S-0102", "sorted").await?;
    let outcome = chain
        .sorting
        .handle_sorting_abnormal(&parcel_id, "wrong chute", "sorter-4")
        .await?;

    let resolved = chain
        .sorting
        .resolve(outcome.record().id(), "re-sorted", "supervisor-1")
        .await?;
    ensure!(resolved.status() == AbnormalRecordStatus::Resolved);
    ensure!(resolved.processing_method() == Some("re-sorted"));

    if chain
        .sorting
        .resolve(outcome.record().id(), "again", "supervisor-1")
        .await
        .is_ok()
    {
        bail!("a resolved record should not resolve twice");
    }
    let records = chain.sorting.records_for(&parcel_id).await?;
    ensure!(records == [resolved]);
    Ok(())
}
