//! Transport task repository contracts.

use super::store_parcel;
use chrono::Utc;
use eyre::{bail, ensure};
use mockable::DefaultClock;
use parcel_flow::{
    parcel::ports::ParcelRepository,
    transport::{
        domain::{TransportBinding, TransportPlan, TransportStatus, TransportTask, TransportTaskId},
        ports::{TransportRepositoryError, TransportTaskRepository},
    },
};

fn task(raw_id: &str, driver: &str) -> eyre::Result<TransportTask> {
    let plan = TransportPlan::new("HZ-Sort", "SZ-Sort", "V1")?.with_driver(driver, "Wang Wu");
    Ok(TransportTask::new(
        TransportTaskId::new(raw_id)?,
        plan,
        &DefaultClock,
    ))
}

/// A task survives a store, update and reload unchanged.
///
/// # Errors
///
/// Returns an error when the adapter breaks the contract.
pub async fn task_round_trips<T: TransportTaskRepository>(tasks: &T) -> eyre::Result<()> {
    let mut stored = task("TRAN-CT-0001", "driver-1")?;
    tasks.store(&stored).await?;
    stored.change_status(TransportStatus::Transporting, &DefaultClock)?;
    tasks.update(&stored).await?;

    let Some(loaded) = tasks.find_by_id(stored.id()).await? else {
        bail!("stored task should load");
    };
    ensure!(loaded.status() == TransportStatus::Transporting);
    ensure!(loaded.started_at().is_some());
    ensure!(loaded.driver_id() == stored.driver_id());

    let Err(err) = tasks.store(&stored).await else {
        bail!("storing the same id twice should fail");
    };
    ensure!(matches!(err, TransportRepositoryError::DuplicateTask(_)));
    Ok(())
}

/// A batch with an already bound parcel is rejected as a whole.
///
/// # Errors
///
/// Returns an error when the adapter breaks the contract.
pub async fn duplicate_binding_rejects_batch<T, P>(tasks: &T, parcels: &P) -> eyre::Result<()>
where
    T: TransportTaskRepository,
    P: ParcelRepository,
{
    let leg = task("TRAN-CT-0002", "driver-2")?;
    tasks.store(&leg).await?;
    let first = store_parcel(parcels, "KD-CT-0001").await?;
    let second = store_parcel(parcels, "KD-CT-0002").await?;
    let now = Utc::now();
    tasks
        .insert_bindings(&[TransportBinding::new(leg.id().clone(), first.clone(), now)])
        .await?;

    let result = tasks
        .insert_bindings(&[
            TransportBinding::new(leg.id().clone(), second.clone(), now),
            TransportBinding::new(leg.id().clone(), first.clone(), now),
        ])
        .await;

    ensure!(matches!(
        result,
        Err(TransportRepositoryError::DuplicateBinding { .. })
    ));
    ensure!(tasks.bound_parcel_ids(leg.id()).await? == [first]);
    ensure!(tasks.count_bindings(leg.id()).await? == 1);
    Ok(())
}

/// Driver listings are newest first and honour the status filter.
///
/// # Errors
///
/// Returns an error when the adapter breaks the contract.
pub async fn driver_listing_filters_by_status<T: TransportTaskRepository>(
    tasks: &T,
) -> eyre::Result<()> {
    let older = task("TRAN-CT-0003", "driver-3")?;
    tasks.store(&older).await?;
    let mut newer = task("TRAN-CT-0004", "driver-3")?;
    newer.change_status(TransportStatus::Transporting, &DefaultClock)?;
    tasks.store(&newer).await?;
    tasks.store(&task("TRAN-CT-0005", "driver-4")?).await?;

    let all = tasks.find_by_driver("driver-3", None).await?;
    let moving = tasks
        .find_by_driver("driver-3", Some(TransportStatus::Transporting))
        .await?;

    let order: Vec<_> = all.iter().map(|found| found.id().as_str()).collect();
    ensure!(order == ["TRAN-CT-0004", "TRAN-CT-0003"]);
    ensure!(moving.len() == 1);
    Ok(())
}
