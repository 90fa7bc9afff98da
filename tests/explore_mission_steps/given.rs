//! Given steps for exploration mission scenarios.

use super::world::MissionWorld;
use rstest_bdd_macros::given;

#[given(r#"a simulated arena with marker {id} at "{waypoint}""#)]
fn arena_with_marker(world: &mut MissionWorld, id: i64, waypoint: String) {
    world.markers.push((id, waypoint));
}
