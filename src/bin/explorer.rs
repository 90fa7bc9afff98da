//! Runs an exploration plan against the simulated robot.
//!
//! Usage:
//!
//! ```text
//! explorer [--config <path.json>] [--plan "<step>;<step>..."]
//! ```
//!
//! Without `--plan` the default exploration plan runs: tour the four corner
//! waypoints sweeping for a marker at each, close the detection phase, then
//! revisit every registered marker in ascending id order to align with and
//! photograph it. Steps use the planner's notation, for example
//! `(move robot wp0 wp1)`.
//!
//! Annotated photographs are written to the configured output directory.

use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use marker_explorer::{
    behavior::{
        adapters::{
            filesystem::DirPhotoStore,
            simulation::{PlacedMarker, SimulatedRobot},
        },
        domain::{PlanStep, PlanStepError, Point2},
        services::{
            ActionRunner, AlignBehavior, EventFanout, FinishDetectionBehavior, MoveBehavior,
            PhotographBehavior, PlanExecutor, PlanProgressMonitor, PlanReport,
            RotateAndDetectBehavior, forward_snapshots, inbox,
        },
    },
    config::{ConfigError, ExplorerConfig},
    registry::{domain::MarkerId, services::RegistryService},
    telemetry,
};
use mockable::DefaultClock;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};

const DEFAULT_PLAN: &[&str] = &[
    "(move robot wp0 wp1)",
    "(rotateanddetect robot wp1 m1)",
    "(move robot wp1 wp2)",
    "(rotateanddetect robot wp2 m2)",
    "(move robot wp2 wp3)",
    "(rotateanddetect robot wp3 m3)",
    "(move robot wp3 wp4)",
    "(rotateanddetect robot wp4 m4)",
    "(finishdetection)",
    "(move robot wp4 wp2)",
    "(align robot m1 wp2)",
    "(photographmarker robot m1 wp2 camera)",
    "(move robot wp2 wp4)",
    "(align robot m2 wp4)",
    "(photographmarker robot m2 wp4 camera)",
    "(move robot wp4 wp1)",
    "(align robot m3 wp1)",
    "(photographmarker robot m3 wp1 camera)",
    "(move robot wp1 wp3)",
    "(align robot m4 wp3)",
    "(photographmarker robot m4 wp3 camera)",
];

const SENSOR_PERIOD: Duration = Duration::from_millis(100);

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
enum ExplorerError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid plan step: {0}")]
    Plan(#[from] PlanStepError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("failed to open photo directory: {0}")]
    PhotoDir(#[source] std::io::Error),
    #[error("plan stopped at step {step}: {message}")]
    PlanFailed { step: String, message: String },
}

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config: Option<Utf8PathBuf>,
    plan: Option<String>,
}

fn main() -> Result<(), BoxError> {
    let args = parse_args(std::env::args().skip(1))?;
    telemetry::init_tracing()?;
    let config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };
    let plan = parse_plan(args.plan.as_deref())?;
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ExplorerError::RuntimeInit)?;
    let report = runtime.block_on(run(config, plan))?;
    check_report(&report).map_err(Into::into)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, ExplorerError> {
    let mut parsed = CliArgs::default();
    while let Some(flag) = args.next() {
        let value = args
            .next()
            .ok_or_else(|| ExplorerError::InvalidArgs(format!("missing value for {flag}")))?;
        match flag.as_str() {
            "--config" => parsed.config = Some(Utf8PathBuf::from(value)),
            "--plan" => parsed.plan = Some(value),
            other => {
                return Err(ExplorerError::InvalidArgs(format!(
                    "unexpected argument: {other}"
                )));
            }
        }
    }
    Ok(parsed)
}

fn parse_plan(text: Option<&str>) -> Result<Vec<PlanStep>, ExplorerError> {
    let steps: Vec<&str> = text.map_or_else(
        || DEFAULT_PLAN.to_vec(),
        |plan| {
            plan.split(';')
                .map(str::trim)
                .filter(|step| !step.is_empty())
                .collect()
        },
    );
    if steps.is_empty() {
        return Err(ExplorerError::InvalidArgs("plan has no steps".to_owned()));
    }
    steps
        .into_iter()
        .map(|step| PlanStep::parse(step).map_err(ExplorerError::from))
        .collect()
}

fn check_report(report: &PlanReport) -> Result<(), ExplorerError> {
    let Some(failed) = report.failed_step() else {
        return Ok(());
    };
    Err(ExplorerError::PlanFailed {
        step: failed.step.to_string(),
        message: failed.completion.message().to_owned(),
    })
}

fn arena_markers() -> Vec<PlacedMarker> {
    vec![
        PlacedMarker::new(MarkerId::new(3), Point2::new(-6.0, -6.0)),
        PlacedMarker::new(MarkerId::new(1), Point2::new(-6.0, 6.0)),
        PlacedMarker::new(MarkerId::new(4), Point2::new(6.0, 6.0)),
        PlacedMarker::new(MarkerId::new(2), Point2::new(6.0, -6.0)),
    ]
}

async fn run(config: ExplorerConfig, plan: Vec<PlanStep>) -> Result<PlanReport, ExplorerError> {
    let (registry, registry_task) = RegistryService::spawn(&config.registry);
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

    let robot = Arc::new(SimulatedRobot::new(arena_markers(), odometry, camera_targets));
    let camera = robot.start_camera(SENSOR_PERIOD);
    let photos = DirPhotoStore::open(Utf8Path::new(&config.photograph.output_dir))
        .map_err(ExplorerError::PhotoDir)?;
    info!(output = %photos.root(), "writing photographs");

    let monitor = Arc::new(PlanProgressMonitor::new(&plan));
    let mut executor = PlanExecutor::new(ActionRunner::new(monitor.clone()))
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
            Arc::new(photos),
            photo_inbox,
        ))
        .with_behavior(FinishDetectionBehavior::new());

    let report = executor.execute(&plan).await;
    if !monitor.all_done() {
        warn!("plan ended before every step completed");
    }

    camera.abort();
    forwarder.abort();
    drop(executor);
    drop(registry);
    if let Err(err) = registry_task.await {
        warn!(error = %err, "registry service ended abnormally");
    }
    Ok(report)
}
