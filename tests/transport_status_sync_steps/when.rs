//! When steps for transport status synchronization scenarios.

use super::world::{TransportWorld, run_async};
use parcel_flow::common::AbnormalReport;
use rstest_bdd_macros::when;

#[when(r#"the transport task moves to "{status}""#)]
fn task_moves(world: &mut TransportWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    match run_async(world.coordinator.change_status(&task_id, &status)) {
        Ok(moved) => world.task = Some(moved.value().clone()),
        Err(err) => world.last_error = Some(err.kind()),
    }
    Ok(())
}

#[when(r#"the driver reports a "{abnormal_type}" abnormality "{reason}""#)]
fn driver_reports(
    world: &mut TransportWorld,
    abnormal_type: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id().clone();
    let report = AbnormalReport::new(abnormal_type, reason, "driver-9");
    match run_async(world.coordinator.report_abnormal(&task_id, report)) {
        Ok(reported) => world.task = Some(reported.value().clone()),
        Err(err) => world.last_error = Some(err.kind()),
    }
    Ok(())
}
