//! Given steps for transport status synchronization scenarios.

use super::world::{TransportWorld, run_async};
use eyre::WrapErr;
use parcel_flow::{
    parcel::{
        domain::{Contact, Dimensions, Region},
        services::CreateParcelRequest,
    },
    transport::services::CreateTransportTaskRequest,
};
use rstest_bdd_macros::given;

fn collection_request(parcel_id: &str) -> Result<CreateParcelRequest, eyre::Report> {
    Ok(CreateParcelRequest::new(
        Contact::new("Li Lei", "13800001111", "1 West Lake Rd, Hangzhou")?,
        Contact::new("Han Meimei", "13987654321", "9 Nanshan Ave, Shenzhen")?,
        Region::new("Guangdong", "Shenzhen", "Nanshan")?,
        Dimensions::weighing(1.5)?,
    )
    .with_parcel_id(parcel_id))
}

#[given(r#"sorted parcels "{first}" and "{second}""#)]
fn sorted_parcels(
    world: &mut TransportWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    for parcel_id in [first, second] {
        let parcel = run_async(world.registry.create_parcel(collection_request(&parcel_id)?))
            .wrap_err("collect parcel for transport scenario")?;
        run_async(world.registry.change_status(parcel.id(), "sorted"))
            .wrap_err("sort parcel for transport scenario")?;
        world.parcel_ids.push(parcel_id);
    }
    Ok(())
}

#[given(r#"a transport task from "{start}" to "{end}" on vehicle "{vehicle}""#)]
fn transport_task(
    world: &mut TransportWorld,
    start: String,
    end: String,
    vehicle: String,
) -> Result<(), eyre::Report> {
    let request = CreateTransportTaskRequest::new(start, end, vehicle)
        .with_driver("driver-9", "Wang Wu");
    let task = run_async(world.coordinator.create_task(request))
        .wrap_err("create transport task for scenario")?;
    world.task = Some(task);
    Ok(())
}

#[given("the parcels are bound to the transport task")]
fn parcels_bound(world: &mut TransportWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let task = run_async(world.coordinator.bind_packages(&task_id, &world.parcel_ids))
        .wrap_err("bind parcels in scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"the transport task has moved to "{status}""#)]
fn task_has_moved(world: &mut TransportWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let moved = run_async(world.coordinator.change_status(&task_id, &status))
        .wrap_err("move transport task in scenario setup")?;
    world.task = Some(moved.value().clone());
    Ok(())
}
