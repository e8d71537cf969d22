//! Delivery task repository contracts.

use super::store_parcel;
use chrono::Utc;
use eyre::{bail, ensure};
use mockable::DefaultClock;
use parcel_flow::{
    delivery::{
        domain::{
            DeliveryAssignment, DeliveryBinding, DeliveryTask, DeliveryTaskId, SignInfo, SignType,
        },
        ports::{DeliveryRepositoryError, DeliveryTaskRepository},
    },
    parcel::{domain::ParcelId, ports::ParcelRepository},
};

fn round(raw_id: &str) -> eyre::Result<DeliveryTask> {
    let assignment =
        DeliveryAssignment::new("Nanshan", "courier-3", "Zhao Liu", "SZ Nanshan Outlet")?;
    Ok(DeliveryTask::new(
        DeliveryTaskId::new(raw_id)?,
        assignment,
        &DefaultClock,
    ))
}

fn bindings(task: &DeliveryTask, parcel_ids: &[ParcelId]) -> Vec<DeliveryBinding> {
    let now = Utc::now();
    (1_u32..)
        .zip(parcel_ids)
        .map(|(order, parcel_id)| {
            DeliveryBinding::new(task.id().clone(), parcel_id.clone(), order, now)
        })
        .collect()
}

/// Replacing bindings drops the previous set entirely.
///
/// # Errors
///
/// Returns an error when the adapter breaks the contract.
pub async fn replace_drops_previous_set<D, P>(tasks: &D, parcels: &P) -> eyre::Result<()>
where
    D: DeliveryTaskRepository,
    P: ParcelRepository,
{
    let task = round("DELI-CT-0001")?;
    tasks.store(&task).await?;
    let a = store_parcel(parcels, "KD-CD-0001").await?;
    let b = store_parcel(parcels, "KD-CD-0002").await?;
    let c = store_parcel(parcels, "KD-CD-0003").await?;

    tasks
        .replace_bindings(task.id(), &bindings(&task, &[a, b]))
        .await?;
    tasks
        .replace_bindings(task.id(), &bindings(&task, &[c.clone()]))
        .await?;

    let current = tasks.bindings_for(task.id()).await?;
    let [only] = current.as_slice() else {
        bail!("expected a single binding, found {}", current.len());
    };
    ensure!(only.parcel_id() == &c);
    ensure!(only.delivery_order() == 1);
    ensure!(tasks.count_bindings(task.id()).await? == 1);
    Ok(())
}

/// A signature written through `update_binding` reloads intact.
///
/// # Errors
///
/// Returns an error when the adapter breaks the contract.
pub async fn signature_round_trips<D, P>(tasks: &D, parcels: &P) -> eyre::Result<()>
where
    D: DeliveryTaskRepository,
    P: ParcelRepository,
{
    let task = round("DELI-CT-0002")?;
    tasks.store(&task).await?;
    let parcel_id = store_parcel(parcels, "KD-CD-0004").await?;
    tasks
        .replace_bindings(task.id(), &bindings(&task, &[parcel_id.clone()]))
        .await?;

    let Some(mut binding) = tasks.find_binding(task.id(), &parcel_id).await? else {
        bail!("bound parcel should be found");
    };
    binding.sign(SignInfo::signed(
        "Han Meimei",
        "13987654321",
        SignType::Agent,
        "guard desk",
        &DefaultClock,
    ));
    tasks.update_binding(&binding).await?;

    let Some(reloaded) = tasks.find_binding(task.id(), &parcel_id).await? else {
        bail!("signed parcel should still be bound");
    };
    let Some(info) = reloaded.sign_info() else {
        bail!("signature should persist");
    };
    ensure!(info.signer_phone() == "*******4321");
    ensure!(info.sign_type() == SignType::Agent);
    ensure!(info.remark() == "guard desk");
    Ok(())
}

/// Updating a binding that does not exist reports it.
///
/// # Errors
///
/// Returns an error when the adapter breaks the contract.
pub async fn update_of_unknown_binding_fails<D: DeliveryTaskRepository>(
    tasks: &D,
) -> eyre::Result<()> {
    let task = round("DELI-CT-0003")?;
    tasks.store(&task).await?;
    let stray = DeliveryBinding::new(
        task.id().clone(),
        ParcelId::new("KD-CD-NOWHERE")?,
        1,
        Utc::now(),
    );

    let result = tasks.update_binding(&stray).await;

    ensure!(matches!(
        result,
        Err(DeliveryRepositoryError::BindingNotFound { .. })
    ));
    Ok(())
}
