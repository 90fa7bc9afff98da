//! Action runner, plan executor and progress monitor tests.

use std::sync::Arc;

use super::support::{ManualClock, detection};
use crate::behavior::{
    adapters::memory::{RecordingReporter, RecordingVelocitySink, ReportEvent},
    domain::{BehaviorKind, Completion, PlanStep},
    ports::ExecutorReporter,
    services::{
        ActionRunner, AlignBehavior, Behavior, FinishDetectionBehavior, PlanExecutor,
        PlanProgressMonitor, StepStatus, inbox,
    },
};
use crate::config::AlignConfig;
use mockable::DefaultClock;
use rstest::rstest;

fn step(text: &str) -> PlanStep {
    PlanStep::parse(text).expect("valid plan step")
}

fn quick_align() -> AlignConfig {
    AlignConfig {
        timeout_ms: 200,
        tick_period_ms: 20,
        ..AlignConfig::default()
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn runner_reports_a_single_finish() {
    let reporter = RecordingReporter::new();
    let runner = ActionRunner::new(Arc::new(reporter.clone()));
    let mut behavior: Behavior<ManualClock> = FinishDetectionBehavior::new().into();
    let finish = step("(finishdetection)");

    let completion = runner.run(&mut behavior, &finish).await;

    assert_eq!(completion, Completion::succeeded("Detection phase completed"));
    assert_eq!(
        reporter.events(),
        vec![ReportEvent::Finish {
            step: "(finishdetection)".to_owned(),
            completion,
        }]
    );
}

#[rstest]
#[tokio::test]
async fn runner_forwards_feedback_until_the_step_finishes() {
    let reporter = RecordingReporter::new();
    let runner = ActionRunner::new(Arc::new(reporter.clone()));
    let (_events, receiver) = inbox(4);
    let mut behavior: Behavior<DefaultClock> = AlignBehavior::new(
        &quick_align(),
        Arc::new(DefaultClock),
        Arc::new(RecordingVelocitySink::new()),
        receiver,
    )
    .into();

    let completion = runner.run(&mut behavior, &step("(align robot m1 wp1)")).await;

    assert_eq!(completion, Completion::succeeded("Alignment timeout"));
    let events = reporter.events();
    assert_eq!(reporter.finishes().len(), 1);
    assert!(matches!(events.last(), Some(ReportEvent::Finish { .. })));
    assert!(events.len() > 1);
    assert!(events.iter().rev().skip(1).all(|event| matches!(
        event,
        ReportEvent::Feedback { message, .. } if message == "Aligning with marker..."
    )));
}

#[rstest]
#[tokio::test]
async fn runner_finishes_when_the_marker_is_centred() {
    let reporter = RecordingReporter::new();
    let runner = ActionRunner::new(Arc::new(reporter.clone()));
    let (events, receiver) = inbox(4);
    let velocity = RecordingVelocitySink::new();
    let mut behavior: Behavior<DefaultClock> = AlignBehavior::new(
        &AlignConfig {
            tick_period_ms: 20,
            ..AlignConfig::default()
        },
        Arc::new(DefaultClock),
        Arc::new(velocity.clone()),
        receiver,
    )
    .into();
    let centred = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(60)).await;
        assert!(events.send(detection(3, 0.01)));
        events
    });

    let completion = runner.run(&mut behavior, &step("(align robot m3 wp1)")).await;

    assert_eq!(completion, Completion::succeeded("Aligned with marker"));
    assert_eq!(reporter.finishes().len(), 1);
    assert!(velocity.last().is_some_and(|command| command.is_stop()));
    drop(centred.await.expect("sender task"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn executor_runs_every_step_in_order() {
    let reporter = RecordingReporter::new();
    let mut executor = PlanExecutor::<ManualClock>::new(ActionRunner::new(Arc::new(
        reporter.clone(),
    )))
    .with_behavior(FinishDetectionBehavior::new());
    let plan = vec![step("(finishdetection)"), step("(finishdetection)")];

    let report = executor.execute(&plan).await;

    assert!(report.succeeded());
    assert_eq!(report.planned(), 2);
    assert_eq!(report.steps().len(), 2);
    assert_eq!(reporter.finishes().len(), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn executor_stops_at_the_first_failed_step() {
    let reporter = RecordingReporter::new();
    let (_events, receiver) = inbox(4);
    let mut executor = PlanExecutor::new(ActionRunner::new(Arc::new(reporter.clone())))
        .with_behavior(AlignBehavior::new(
            &AlignConfig::default(),
            Arc::new(ManualClock::new()),
            Arc::new(RecordingVelocitySink::new()),
            receiver,
        ))
        .with_behavior(FinishDetectionBehavior::new());
    let plan = vec![
        step("(finishdetection)"),
        step("(align robot m1)"),
        step("(finishdetection)"),
    ];

    let report = executor.execute(&plan).await;

    assert!(!report.succeeded());
    assert_eq!(report.steps().len(), 2);
    let failed = report.failed_step().expect("a failed step");
    assert_eq!(failed.step, plan[1]);
    assert_eq!(failed.completion, Completion::failed("Insufficient arguments"));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn step_without_a_behavior_fails() {
    let reporter = RecordingReporter::new();
    let mut executor = PlanExecutor::<ManualClock>::new(ActionRunner::new(Arc::new(
        reporter.clone(),
    )));
    let plan = vec![step("(move robot wp0 wp1)")];

    let report = executor.execute(&plan).await;

    assert_eq!(
        report.failed_step().map(|failed| failed.completion.clone()),
        Some(Completion::failed("No behavior for move"))
    );
    assert_eq!(reporter.finishes().len(), 1);
}

#[rstest]
fn installing_a_kind_twice_keeps_one_behavior() {
    let reporter = RecordingReporter::new();
    let mut executor = PlanExecutor::<ManualClock>::new(ActionRunner::new(Arc::new(reporter)))
        .with_behavior(FinishDetectionBehavior::new())
        .with_behavior(FinishDetectionBehavior::new());

    let finish = step("(finishdetection)");
    assert!(executor
        .behavior_mut(&finish)
        .is_some_and(|behavior| behavior.kind() == BehaviorKind::FinishDetection));
    assert!(executor.behavior_mut(&step("(align robot m1 wp1)")).is_none());
}

#[rstest]
fn monitor_tracks_feedback_and_finish() {
    let plan = vec![step("(move robot wp0 wp1)"), step("(finishdetection)")];
    let monitor = PlanProgressMonitor::new(&plan);
    assert_eq!(monitor.status(&plan[0]), Some(StepStatus::NotExecuted));

    monitor.feedback(&plan[0], 0.4, "Moving to wp1");
    let records = monitor.snapshot();
    assert_eq!(records[0].status, StepStatus::Executing);
    assert!((records[0].completion - 0.4).abs() < f64::EPSILON);
    assert_eq!(records[0].message, "Moving to wp1");

    monitor.finish(&plan[0], &Completion::succeeded("Move completed"));
    assert_eq!(monitor.status(&plan[0]), Some(StepStatus::Succeeded));
    assert!(!monitor.all_done());

    monitor.finish(&plan[1], &Completion::succeeded("Detection phase completed"));
    assert!(monitor.all_done());
}

#[rstest]
fn monitor_marks_failures_and_ignores_unknown_steps() {
    let plan = vec![step("(align robot m1 wp1)")];
    let monitor = PlanProgressMonitor::new(&plan);

    monitor.finish(&step("(finishdetection)"), &Completion::succeeded("done"));
    assert_eq!(monitor.snapshot()[0].status, StepStatus::NotExecuted);

    monitor.finish(&plan[0], &Completion::failed("Insufficient arguments"));
    assert_eq!(monitor.status(&plan[0]), Some(StepStatus::Failed));
    assert!(!monitor.all_done());
}

#[rstest]
fn repeated_steps_are_tracked_separately() {
    let plan = vec![step("(finishdetection)"), step("(finishdetection)")];
    let monitor = PlanProgressMonitor::new(&plan);

    monitor.finish(&plan[0], &Completion::succeeded("first"));
    let records = monitor.snapshot();
    assert_eq!(records[0].status, StepStatus::Succeeded);
    assert_eq!(records[1].status, StepStatus::NotExecuted);

    monitor.finish(&plan[1], &Completion::succeeded("second"));
    assert_eq!(monitor.snapshot()[1].message, "second");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn monitor_as_reporter_sees_the_whole_plan() {
    let plan = vec![step("(finishdetection)")];
    let monitor = Arc::new(PlanProgressMonitor::new(&plan));
    let mut executor = PlanExecutor::<ManualClock>::new(ActionRunner::new(monitor.clone()))
        .with_behavior(FinishDetectionBehavior::new());

    let report = executor.execute(&plan).await;

    assert!(report.succeeded());
    assert!(monitor.all_done());
}
