//! Then steps for exploration mission scenarios.

use super::world::{MissionWorld, run_async};
use eyre::{Result, WrapErr, eyre};
use marker_explorer::behavior::services::PlanReport;
use marker_explorer::registry::{domain::MarkerId, ports::MarkerRegistry};
use rstest_bdd_macros::then;

fn report(world: &MissionWorld) -> Result<&PlanReport> {
    world
        .report
        .as_ref()
        .ok_or_else(|| eyre!("no plan was run"))
}

#[then("the plan succeeds")]
fn plan_succeeds(world: &MissionWorld) -> Result<()> {
    let report = report(world)?;
    if let Some(failed) = report.failed_step() {
        return Err(eyre!(
            "step {} failed: {}",
            failed.step,
            failed.completion.message()
        ));
    }
    assert!(report.succeeded());
    Ok(())
}

#[then(r#"the plan fails at "{step}" with "{message}""#)]
fn plan_fails_at(world: &MissionWorld, step: String, message: String) -> Result<()> {
    let failed = report(world)?
        .failed_step()
        .ok_or_else(|| eyre!("expected a failed step"))?;

    assert_eq!(failed.step.to_string(), step);
    assert_eq!(failed.completion.message(), message);
    Ok(())
}

#[then(r#"the registry lists marker {id} at "{waypoint}""#)]
fn registry_lists(world: &MissionWorld, id: i64, waypoint: String) -> Result<()> {
    let registry = world
        .registry
        .as_ref()
        .ok_or_else(|| eyre!("registry not started"))?;
    let snapshot = run_async(registry.snapshot()).wrap_err("registry snapshot")?;

    let record = snapshot
        .iter()
        .find(|record| record.id() == MarkerId::new(id))
        .ok_or_else(|| eyre!("marker {id} not registered"))?;
    assert_eq!(record.origin_waypoint().as_str(), waypoint);
    Ok(())
}

#[then("a photo of marker {id} was saved")]
fn photo_saved(world: &MissionWorld, id: i64) -> Result<()> {
    let photo = world
        .photos
        .photo(MarkerId::new(id))
        .ok_or_else(|| eyre!("no photo of marker {id}"))?;

    assert_eq!(photo.dimensions(), (640, 480));
    Ok(())
}
