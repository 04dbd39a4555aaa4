// SPDX-License-Identifier: MIT

//! The queue-backed run coordinator contract.

use skein_coordinator::{Instance, NoopLauncher, QueuedCoordinatorConfig, QueuedRunCoordinator};
use skein_core::{FakeClock, PipelineRun, RunEvent, RunId, RunStatus};
use std::sync::Arc;

fn setup() -> (QueuedRunCoordinator, Arc<Instance>) {
    let instance = Arc::new(Instance::new(
        Box::new(NoopLauncher),
        Box::new(FakeClock::at(42_000)),
    ));
    let coordinator = QueuedRunCoordinator::new(&instance, QueuedCoordinatorConfig::default());
    (coordinator, instance)
}

fn submit(coordinator: &QueuedRunCoordinator, instance: &Instance, id: &str) -> RunId {
    let run = PipelineRun::new(RunId::new(id), "etl");
    instance.add_run(run.clone());
    coordinator.submit_run(run).unwrap();
    RunId::new(id)
}

#[test]
fn queued_run_lifecycle() {
    let (coordinator, instance) = setup();
    let run_id = submit(&coordinator, &instance, "r-1");

    // Exactly one enqueued event precedes the Queued status.
    let enqueued: Vec<_> = instance
        .events_for_run(&run_id)
        .into_iter()
        .filter(|r| matches!(r.event, RunEvent::PipelineEnqueued { .. }))
        .collect();
    assert_eq!(enqueued.len(), 1);
    assert_eq!(enqueued[0].timestamp_ms, 42_000);
    assert_eq!(
        instance.get_run_by_id(&run_id).unwrap().status,
        RunStatus::Queued
    );

    // A queued run is cancellable, and cancelling marks it failed.
    assert!(coordinator.can_cancel_run(&run_id).unwrap());
    assert!(coordinator.cancel_run(&run_id).unwrap());
    assert_eq!(
        instance.get_run_by_id(&run_id).unwrap().status,
        RunStatus::Failure
    );

    // Repeat cancels are no-ops reporting false.
    assert!(!coordinator.cancel_run(&run_id).unwrap());
    assert!(!coordinator.can_cancel_run(&run_id).unwrap());
}

#[test]
fn submit_returns_the_run_unchanged() {
    let (coordinator, instance) = setup();
    let run = PipelineRun::new(RunId::new("r-2"), "etl");
    instance.add_run(run.clone());
    let returned = coordinator.submit_run(run.clone()).unwrap();
    assert_eq!(returned, run);
}

#[test]
fn missing_runs_cancel_as_false_not_errors() {
    let (coordinator, _instance) = setup();
    let ghost = RunId::new("ghost");
    assert!(!coordinator.can_cancel_run(&ghost).unwrap());
    assert!(!coordinator.cancel_run(&ghost).unwrap());
}

#[test]
fn coordinator_configuration_defaults() {
    let (coordinator, _instance) = setup();
    assert_eq!(coordinator.config().max_concurrent_runs, 10);
    assert_eq!(coordinator.config().dequeue_interval_seconds, 5);
}
