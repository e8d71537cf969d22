//! Then steps for transport status synchronization scenarios.

use super::world::{TransportWorld, run_async};
use parcel_flow::{
    parcel::domain::{ParcelId, ParcelStatus},
    transport::domain::TransportStatus,
};
use rstest_bdd_macros::then;

#[then(r#"the transport task status is "{status}""#)]
fn task_status_is(world: &TransportWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TransportStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let stored = run_async(world.coordinator.get_task(world.task()?.id()))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected transport status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"parcel "{parcel_id}" has status "{status}""#)]
fn parcel_status_is(
    world: &TransportWorld,
    parcel_id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = ParcelStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let parcel = run_async(world.registry.get(&ParcelId::new(parcel_id)?))?;

    if parcel.status() != expected {
        return Err(eyre::eyre!(
            "expected parcel status {expected}, found {}",
            parcel.status()
        ));
    }
    Ok(())
}

#[then(r#"the request fails with "{code}""#)]
fn request_fails_with(world: &TransportWorld, code: String) -> Result<(), eyre::Report> {
    let kind = world
        .last_error
        .ok_or_else(|| eyre::eyre!("expected the request to fail"))?;

    if kind.as_str() != code {
        return Err(eyre::eyre!("expected {code} error, got {kind}"));
    }
    Ok(())
}
