//! Given steps for delivery signing scenarios.

use super::world::{DeliveryWorld, run_async};
use eyre::WrapErr;
use parcel_flow::{
    delivery::services::CreateDeliveryTaskRequest,
    parcel::{
        domain::{Contact, Dimensions, Region},
        services::CreateParcelRequest,
    },
};
use rstest_bdd_macros::given;

#[given(r#"arrived parcels "{first}" and "{second}""#)]
fn arrived_parcels(
    world: &mut DeliveryWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    for parcel_id in [first, second] {
        let request = CreateParcelRequest::new(
            Contact::new("Li Lei", "13800001111", "1 West Lake Rd, Hangzhou")?,
            Contact::new("Han Meimei", "13987654321", "9 Nanshan Ave, Shenzhen")?,
            Region::new("Guangdong", "Shenzhen", "Nanshan")?,
            Dimensions::weighing(0.8)?,
        )
        .with_parcel_id(parcel_id);
        let parcel = run_async(world.registry.create_parcel(request))
            .wrap_err("collect parcel for delivery scenario")?;
        run_async(world.registry.change_status(parcel.id(), "arrived"))
            .wrap_err("mark parcel arrived for delivery scenario")?;
    }
    Ok(())
}

#[given(r#"a delivery round in "{area}" for courier "{courier}""#)]
fn delivery_round(
    world: &mut DeliveryWorld,
    area: String,
    courier: String,
) -> Result<(), eyre::Report> {
    let request = CreateDeliveryTaskRequest::new(area, courier, "Zhao Liu", "SZ Nanshan Outlet");
    let task = run_async(world.coordinator.create_task(request))
        .wrap_err("create delivery round for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"the round carries "{first}" and "{second}""#)]
fn round_carries(
    world: &mut DeliveryWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let task = run_async(world.coordinator.bind_packages(&task_id, &[first, second]))
        .wrap_err("bind parcels in scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given("the round is out for delivery")]
fn round_out_for_delivery(world: &mut DeliveryWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let moved = run_async(world.coordinator.change_status(&task_id, "delivering"))
        .wrap_err("start delivery round in scenario setup")?;
    world.task = Some(moved.value().clone());
    Ok(())
}
