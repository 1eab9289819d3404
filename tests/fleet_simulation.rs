use std::collections::BTreeSet;

use fleetdispatch::*;

fn drive_to_completion(config: DispatcherConfig, seed: u64) -> Simulation {
    let mut sim = Simulation::from_seed(config, 5, 50, seed).unwrap();
    let mut done: BTreeSet<TaskId> = BTreeSet::new();

    while !sim.is_done() {
        assert!(sim.frames() < 100_000, "simulation stalled");
        sim.step(16).unwrap();

        let violations = sim.dispatcher.invariant_violations();
        assert!(violations.is_empty(), "{violations:?}");

        // completed tasks never come back
        for id in &done {
            assert_eq!(sim.dispatcher.task(*id).unwrap().state, TaskState::Completed);
        }
        done = sim.dispatcher.completed_tasks().clone();
    }
    sim
}

#[test]
fn fifty_tasks_five_drones_all_complete() {
    let sim = drive_to_completion(DispatcherConfig::default(), 2024);
    let d = &sim.dispatcher;

    assert_eq!(d.completed_tasks().len(), 50);
    assert!(d.drones().all(|x| x.current_task.is_none()));
    assert!(d.tasks().all(|t| t.assigned_drone.is_none() && t.completed_by.is_some()));

    let report = d.export_metrics();
    assert_eq!(report.completed_tasks, 50);
    assert_eq!(report.pending_tasks, 0);
    assert_eq!(report.active_drones, 0);
    assert_eq!(report.estimated_completion_ms, None);
    assert!(report.average_task_time_ms >= 1000.0);
    assert!(report.counters.total_assignments >= 50);
    assert!(d.sectors().iter().all(|s| s.tasks.is_empty()));

    let total: u32 = d.drones().map(|x| x.tasks_completed).sum();
    assert_eq!(total, 50);
}

#[test]
fn exact_solver_also_drains_the_field() {
    let config = DispatcherConfig {
        strategy: MatchStrategy::Hungarian,
        rebalance_interval_ms: Some(2_000),
        ..DispatcherConfig::default()
    };
    let sim = drive_to_completion(config, 7);
    assert_eq!(sim.dispatcher.completed_tasks().len(), 50);
}

#[test]
fn summary_reflects_finished_run() {
    let mut sim = Simulation::from_seed(DispatcherConfig::default(), 3, 12, 99).unwrap();
    let frames = sim.run_to_completion(16, 100_000).unwrap();
    assert!(frames.is_some());

    let report = sim.dispatcher.export_metrics();
    let line = format_summary(&report);
    assert!(line.contains("Tasks: 12/12 done"));
    let panel = format_side_panel(&sim.dispatcher);
    assert!(panel.iter().any(|l| l.contains("Drones")));
    assert_eq!(panel.iter().filter(|l| l.ends_with("Done")).count(), 12);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["completed_tasks"], 12);
}
