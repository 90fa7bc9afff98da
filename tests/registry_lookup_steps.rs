//! Behavioural tests for marker registry lookups.

use eyre::{Result, WrapErr, eyre};
use marker_explorer::{
    config::RegistryConfig,
    registry::{
        domain::{MarkerId, RegistryLookupError, WaypointName},
        ports::{MarkerRegistry, MarkerRegistryError, MarkerRegistryResult},
        services::{RegistryHandle, RegistryService},
    },
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Default)]
struct RegistryWorld {
    registry: Option<RegistryHandle>,
    last_lookup: Option<MarkerRegistryResult<WaypointName>>,
}

impl RegistryWorld {
    fn registry(&self) -> Result<&RegistryHandle> {
        self.registry
            .as_ref()
            .ok_or_else(|| eyre!("registry not started"))
    }
}

#[fixture]
fn world() -> RegistryWorld {
    RegistryWorld::default()
}

fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[given("a running marker registry")]
fn running_registry(world: &mut RegistryWorld) {
    let (handle, _task) = RegistryService::spawn(&RegistryConfig::default());
    world.registry = Some(handle);
    world.last_lookup = None;
}

#[when(r#"marker {id} is registered at "{waypoint}""#)]
fn register_marker(world: &mut RegistryWorld, id: i64, waypoint: String) -> Result<()> {
    let name = WaypointName::new(waypoint).wrap_err("waypoint name")?;
    let stored = run_async(world.registry()?.add_marker(MarkerId::new(id), name.clone()))
        .wrap_err("add marker")?;
    if stored != name {
        return Err(eyre!("registry echoed {stored}, expected {name}"));
    }
    Ok(())
}

#[when("I request marker rank {rank}")]
fn request_rank(world: &mut RegistryWorld, rank: i64) -> Result<()> {
    let lookup = run_async(world.registry()?.get_nth_marker(rank));
    world.last_lookup = Some(lookup);
    Ok(())
}

#[then("the lookup fails because no markers are registered")]
fn lookup_fails_empty(world: &RegistryWorld) -> Result<()> {
    let lookup = world
        .last_lookup
        .as_ref()
        .ok_or_else(|| eyre!("expected a lookup result"))?;

    assert!(matches!(
        lookup,
        Err(MarkerRegistryError::Lookup(RegistryLookupError::EmptyRegistry))
    ));
    Ok(())
}

#[then(r#"marker rank {rank} is at "{waypoint}""#)]
fn rank_is_at(world: &RegistryWorld, rank: i64, waypoint: String) -> Result<()> {
    let found = run_async(world.registry()?.get_nth_marker(rank)).wrap_err("lookup")?;

    assert_eq!(found.as_str(), waypoint);
    Ok(())
}

#[then("marker rank {rank} is out of range")]
fn rank_out_of_range(world: &RegistryWorld, rank: i64) -> Result<()> {
    let lookup = run_async(world.registry()?.get_nth_marker(rank));

    assert!(matches!(
        lookup,
        Err(MarkerRegistryError::Lookup(RegistryLookupError::IndexOutOfRange { index, .. }))
        if index == rank
    ));
    Ok(())
}

#[then("the registry holds {count} marker")]
fn registry_holds(world: &RegistryWorld, count: usize) -> Result<()> {
    let snapshot = run_async(world.registry()?.snapshot()).wrap_err("snapshot")?;

    assert_eq!(snapshot.len(), count);
    Ok(())
}

#[scenario(
    path = "tests/features/registry_lookup.feature",
    name = "Lookup against an empty registry fails"
)]
#[tokio::test(flavor = "multi_thread")]
async fn empty_registry_lookup(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/registry_lookup.feature",
    name = "Markers are ranked by ascending id"
)]
#[tokio::test(flavor = "multi_thread")]
async fn ranked_by_id(world: RegistryWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/registry_lookup.feature",
    name = "Re-registering a marker moves it"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reregistered_marker_moves(world: RegistryWorld) {
    let _ = world;
}
