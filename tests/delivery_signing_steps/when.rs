//! When steps for delivery signing scenarios.

use super::world::{DeliveryWorld, run_async};
use eyre::WrapErr;
use parcel_flow::delivery::services::SignPackageRequest;
use rstest_bdd_macros::when;

#[when(r#"the courier signs "{parcel_id}" for "{signer}" on "{phone}""#)]
fn courier_signs(
    world: &mut DeliveryWorld,
    parcel_id: String,
    signer: String,
    phone: String,
) -> Result<(), eyre::Report> {
    let task = world.task()?;
    let request =
        SignPackageRequest::new(task.courier_id(), parcel_id, signer, phone, "person");
    run_async(world.coordinator.sign_package(task.id(), request)).wrap_err("sign parcel")?;
    Ok(())
}

#[when(r#"the round moves to "{status}""#)]
fn round_moves(world: &mut DeliveryWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    match run_async(world.coordinator.change_status(&task_id, &status)) {
        Ok(moved) => world.task = Some(moved.value().clone()),
        Err(err) => world.last_error = Some(err.kind()),
    }
    Ok(())
}

#[when(r#"the round is rebound to "{parcel_id}" only"#)]
fn round_rebound(world: &mut DeliveryWorld, parcel_id: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let task = run_async(world.coordinator.bind_packages(&task_id, &[parcel_id]))
        .wrap_err("rebind round")?;
    world.task = Some(task);
    Ok(())
}
