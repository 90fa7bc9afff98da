//! Shared world state for exploration mission scenarios.

use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, WrapErr};
use marker_explorer::{
    behavior::{
        adapters::{
            memory::InMemoryPhotoStore,
            simulation::{PlacedMarker, SimulatedRobot},
        },
        domain::{PlanStep, WaypointTable},
        services::{
            ActionRunner, AlignBehavior, EventFanout, FinishDetectionBehavior, MoveBehavior,
            PhotographBehavior, PlanExecutor, PlanProgressMonitor, PlanReport,
            RotateAndDetectBehavior, forward_snapshots, inbox,
        },
    },
    config::{
        AlignConfig, ExplorerConfig, NavigationConfig, PhotographConfig, RegistryConfig,
        RotateConfig,
    },
    registry::{
        domain::MarkerId,
        services::{RegistryHandle, RegistryService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

const TOUR: [&str; 4] = ["wp1", "wp2", "wp3", "wp4"];
const CAMERA_PERIOD: Duration = Duration::from_millis(50);
const ROBOT_SPEED: f64 = 60.0;
const MOTION_STEP: Duration = Duration::from_millis(20);

/// Scenario world for exploration missions.
#[derive(Default)]
pub struct MissionWorld {
    pub markers: Vec<(i64, String)>,
    pub photos: InMemoryPhotoStore,
    pub registry: Option<RegistryHandle>,
    pub report: Option<PlanReport>,
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MissionWorld {
    MissionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Short deadlines and periods so scenarios finish in a few seconds.
pub fn mission_config() -> ExplorerConfig {
    ExplorerConfig {
        align: AlignConfig {
            tick_period_ms: 50,
            ..AlignConfig::default()
        },
        rotate: RotateConfig {
            timeout_ms: 1_000,
            tick_period_ms: 50,
            ..RotateConfig::default()
        },
        navigation: NavigationConfig {
            tick_period_ms: 50,
            ..NavigationConfig::default()
        },
        photograph: PhotographConfig {
            timeout_ms: 2_000,
            tick_period_ms: 50,
            ..PhotographConfig::default()
        },
        registry: RegistryConfig {
            broadcast_period_ms: 50,
            ..RegistryConfig::default()
        },
        ..ExplorerConfig::default()
    }
}

/// Builds the tour-then-revisit plan for the placed markers.
pub fn exploration_plan(markers: &[(i64, String)]) -> Result<Vec<PlanStep>> {
    let mut texts = Vec::new();
    let mut previous = "wp0".to_owned();
    for waypoint in TOUR {
        texts.push(format!("(move robot {previous} {waypoint})"));
        if let Some((id, _)) = markers.iter().find(|(_, placed)| placed == waypoint) {
            texts.push(format!("(rotateanddetect robot {waypoint} m{id})"));
        }
        waypoint.clone_into(&mut previous);
    }
    texts.push("(finishdetection)".to_owned());

    let mut revisits = markers.to_vec();
    revisits.sort_by_key(|(id, _)| *id);
    for (id, waypoint) in revisits {
        texts.push(format!("(move robot {previous} {waypoint})"));
        texts.push(format!("(align robot m{id} {waypoint})"));
        texts.push(format!("(photographmarker robot m{id} {waypoint} camera)"));
        previous = waypoint;
    }

    texts
        .iter()
        .map(|text| PlanStep::parse(text).wrap_err_with(|| format!("parse {text}")))
        .collect()
}

/// Wires the simulated robot, the registry and every behavior, then runs
/// `plan` to completion.
pub async fn run_mission(world: &mut MissionWorld, plan: Vec<PlanStep>) -> Result<()> {
    let config = mission_config();
    let table = WaypointTable::default_tour();
    let placed = world
        .markers
        .iter()
        .map(|(id, waypoint)| {
            table
                .resolve(waypoint)
                .map(|location| PlacedMarker::new(MarkerId::new(*id), location))
                .wrap_err("marker waypoint")
        })
        .collect::<Result<Vec<_>>>()?;

    let (registry, _registry_task) = RegistryService::spawn(&config.registry);
    let clock = Arc::new(DefaultClock);
    let (align_tx, align_inbox) = inbox(config.inbox_capacity);
    let (rotate_tx, rotate_inbox) = inbox(config.inbox_capacity);
    let (move_tx, move_inbox) = inbox(config.inbox_capacity);
    let (photo_tx, photo_inbox) = inbox(config.inbox_capacity);
    let forwarder = forward_snapshots(registry.subscribe(), move_tx.clone());
    let odometry = EventFanout::new()
        .with_target(rotate_tx.clone())
        .with_target(move_tx);
    let camera_targets = EventFanout::new()
        .with_target(align_tx)
        .with_target(rotate_tx)
        .with_target(photo_tx);
    let robot = Arc::new(SimulatedRobot::with_motion(
        placed,
        odometry,
        camera_targets,
        ROBOT_SPEED,
        MOTION_STEP,
    ));
    let camera = robot.start_camera(CAMERA_PERIOD);

    let monitor = Arc::new(PlanProgressMonitor::new(&plan));
    let mut executor = PlanExecutor::new(ActionRunner::new(monitor))
        .with_behavior(AlignBehavior::new(
            &config.align,
            Arc::clone(&clock),
            robot.clone(),
            align_inbox,
        ))
        .with_behavior(RotateAndDetectBehavior::new(
            &config.rotate,
            Arc::clone(&clock),
            robot.clone(),
            Arc::new(registry.clone()),
            rotate_inbox,
        ))
        .with_behavior(MoveBehavior::new(
            &config.navigation,
            Arc::clone(&clock),
            robot.clone(),
            move_inbox,
        ))
        .with_behavior(PhotographBehavior::new(
            &config.photograph,
            Arc::clone(&clock),
            Arc::new(world.photos.clone()),
            photo_inbox,
        ))
        .with_behavior(FinishDetectionBehavior::new());

    let report = executor.execute(&plan).await;
    camera.abort();
    forwarder.abort();
    world.report = Some(report);
    world.registry = Some(registry);
    Ok(())
}
