//! Then steps for delivery signing scenarios.

use super::world::{DeliveryWorld, run_async};
use parcel_flow::{
    delivery::domain::DeliveryStatus,
    parcel::domain::{ParcelId, ParcelStatus},
};
use rstest_bdd_macros::then;

#[then(r#"the round status is "{status}""#)]
fn round_status_is(world: &DeliveryWorld, status: String) -> Result<(), eyre::Report> {
    let expected = DeliveryStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let stored = run_async(world.coordinator.get_task(world.task()?.id()))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected round status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"parcel "{parcel_id}" has status "{status}""#)]
fn parcel_status_is(
    world: &DeliveryWorld,
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
fn request_fails_with(world: &DeliveryWorld, code: String) -> Result<(), eyre::Report> {
    let kind = world
        .last_error
        .ok_or_else(|| eyre::eyre!("expected the request to fail"))?;

    if kind.as_str() != code {
        return Err(eyre::eyre!("expected {code} error, got {kind}"));
    }
    Ok(())
}

#[then(r#"the signature for "{parcel_id}" shows phone "{phone}""#)]
fn signature_shows_phone(
    world: &DeliveryWorld,
    parcel_id: String,
    phone: String,
) -> Result<(), eyre::Report> {
    let parcel_id = ParcelId::new(parcel_id)?;
    let bindings = run_async(world.coordinator.bindings(world.task()?.id()))?;
    let signature = bindings
        .iter()
        .find(|binding| binding.parcel_id() == &parcel_id)
        .and_then(|binding| binding.sign_info())
        .ok_or_else(|| eyre::eyre!("no signature for {parcel_id}"))?;

    if signature.signer_phone() != phone {
        return Err(eyre::eyre!(
            "expected phone {phone}, found {}",
            signature.signer_phone()
        ));
    }
    Ok(())
}

#[then(r#"the round binds exactly "{parcel_id}" at position {order:u32}"#)]
fn round_binds_exactly(
    world: &DeliveryWorld,
    parcel_id: String,
    order: u32,
) -> Result<(), eyre::Report> {
    let bindings = run_async(world.coordinator.bindings(world.task()?.id()))?;
    let [binding] = bindings.as_slice() else {
        return Err(eyre::eyre!("expected one binding, found {}", bindings.len()));
    };

    if binding.parcel_id().as_str() != parcel_id || binding.delivery_order() != order {
        return Err(eyre::eyre!(
            "expected {parcel_id} at {order}, found {} at {}",
            binding.parcel_id(),
            binding.delivery_order()
        ));
    }
    Ok(())
}
