//! Tests for the registry service actor and its handle.

use std::time::Duration;

use crate::config::RegistryConfig;
use crate::registry::{
    domain::{MarkerId, RegistryLookupError, WaypointName},
    ports::{MarkerRegistry, MarkerRegistryError},
    services::{RegistryHandle, RegistryService},
};
use eyre::{Result, eyre};
use rstest::{fixture, rstest};

fn waypoint(name: &str) -> WaypointName {
    WaypointName::new(name).expect("valid waypoint name")
}

#[fixture]
fn config() -> RegistryConfig {
    RegistryConfig::default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lookups_follow_ascending_id_order(config: RegistryConfig) -> Result<()> {
    let (registry, _task) = RegistryService::spawn(&config);

    let empty = registry.get_nth_marker(0).await;
    assert!(matches!(
        empty,
        Err(MarkerRegistryError::Lookup(RegistryLookupError::EmptyRegistry))
    ));

    registry.add_marker(MarkerId::new(5), waypoint("wp1")).await?;
    registry.add_marker(MarkerId::new(2), waypoint("wp2")).await?;
    registry.add_marker(MarkerId::new(9), waypoint("wp3")).await?;

    assert_eq!(registry.get_nth_marker(0).await?, waypoint("wp2"));
    assert_eq!(registry.get_nth_marker(2).await?, waypoint("wp3"));
    let out_of_range = registry.get_nth_marker(3).await;
    assert!(matches!(
        out_of_range,
        Err(MarkerRegistryError::Lookup(RegistryLookupError::IndexOutOfRange {
            index: 3,
            count: 3
        }))
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_marker_echoes_and_overwrites(config: RegistryConfig) -> Result<()> {
    let (registry, _task) = RegistryService::spawn(&config);

    let first = registry.add_marker(MarkerId::new(4), waypoint("wp1")).await?;
    let second = registry.add_marker(MarkerId::new(4), waypoint("wp3")).await?;

    assert_eq!(first, waypoint("wp1"));
    assert_eq!(second, waypoint("wp3"));
    let snapshot = registry.snapshot().await?;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.get_nth_marker(0).await?, waypoint("wp3"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submitted_markers_are_visible_to_later_requests(config: RegistryConfig) -> Result<()> {
    let (registry, _task) = RegistryService::spawn(&config);

    registry.submit_marker(MarkerId::new(11), waypoint("wp2"))?;
    let snapshot = registry.snapshot().await?;

    assert_eq!(
        snapshot.get(0).map(|record| record.id()),
        Some(MarkerId::new(11))
    );
    Ok(())
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn broadcasts_the_sorted_snapshot_periodically(config: RegistryConfig) -> Result<()> {
    let (registry, _task) = RegistryService::spawn(&config);
    let mut snapshots = registry.subscribe();

    registry.add_marker(MarkerId::new(8), waypoint("wp4")).await?;
    registry.add_marker(MarkerId::new(1), waypoint("wp1")).await?;

    let deadline = Duration::from_secs(2);
    let snapshot = tokio::time::timeout(deadline, async {
        loop {
            match snapshots.recv().await {
                Ok(snapshot) if snapshot.len() == 2 => return Ok(snapshot),
                Ok(_) => {}
                Err(err) => return Err(eyre!("broadcast closed: {err}")),
            }
        }
    })
    .await??;

    let ids: Vec<i64> = snapshot.iter().map(|record| record.id().value()).collect();
    assert_eq!(ids, vec![1, 8]);

    let repeat = tokio::time::timeout(deadline, snapshots.recv()).await??;
    assert_eq!(repeat, snapshot, "unchanged registries are re-broadcast");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn running_service_reports_ready(config: RegistryConfig) {
    let (registry, _task) = RegistryService::spawn(&config);

    assert!(registry.is_running());
    assert!(registry.wait_until_ready(Duration::from_millis(100)).await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stopped_service_is_unavailable(config: RegistryConfig) {
    let (service, registry): (RegistryService, RegistryHandle) = RegistryService::new(&config);
    drop(service);

    assert!(!registry.is_running());
    assert!(!registry.wait_until_ready(Duration::from_millis(10)).await);
    assert!(matches!(
        registry.add_marker(MarkerId::new(1), waypoint("wp1")).await,
        Err(MarkerRegistryError::Unavailable(_))
    ));
    assert!(matches!(
        registry.submit_marker(MarkerId::new(1), waypoint("wp1")),
        Err(MarkerRegistryError::Unavailable(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn service_stops_when_every_handle_is_dropped(config: RegistryConfig) -> Result<()> {
    let (registry, task) = RegistryService::spawn(&config);
    registry.add_marker(MarkerId::new(1), waypoint("wp1")).await?;

    drop(registry);
    tokio::time::timeout(Duration::from_secs(1), task).await??;
    Ok(())
}
