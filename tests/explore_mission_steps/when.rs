//! When steps for exploration mission scenarios.

use super::world::{MissionWorld, exploration_plan, run_async, run_mission};
use eyre::{Result, WrapErr};
use marker_explorer::behavior::domain::PlanStep;
use rstest_bdd_macros::when;

#[when(r#"the robot runs the plan "{plan}""#)]
fn run_plan(world: &mut MissionWorld, plan: String) -> Result<()> {
    let steps = plan
        .split(';')
        .map(|text| PlanStep::parse(text).wrap_err_with(|| format!("parse {text}")))
        .collect::<Result<Vec<_>>>()?;
    run_async(run_mission(world, steps))
}

#[when("the robot runs the full exploration of {count} markers")]
fn run_full_exploration(world: &mut MissionWorld, count: usize) -> Result<()> {
    if world.markers.len() != count {
        return Err(eyre::eyre!(
            "scenario placed {} markers, expected {count}",
            world.markers.len()
        ));
    }
    let plan = exploration_plan(&world.markers)?;
    run_async(run_mission(world, plan))
}
