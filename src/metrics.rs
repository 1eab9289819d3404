use serde::{Deserialize, Serialize};

/// Running counters kept by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_assignments: u64,
    pub conflicts: u64,
    pub preemptions: u64,
    pub rebalances: u64,
    /// Percentage in `0..=100`, refreshed after every completion.
    pub efficiency: f64,
}

/// Snapshot returned by `Dispatcher::export_metrics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    #[serde(flatten)]
    pub counters: Metrics,
    pub total_drones: usize,
    pub active_drones: usize,
    pub idle_drones: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub assigned_tasks: usize,
    pub average_task_time_ms: f64,
    /// `None` while no drone is busy.
    pub estimated_completion_ms: Option<f64>,
}

impl MetricsReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `0.5 * completion + 0.3 * utilization + 0.2 * conflict_penalty`, scaled to percent.
pub fn efficiency(
    total_tasks: usize,
    completed_tasks: usize,
    total_drones: usize,
    active_drones: usize,
    conflicts: u64,
) -> f64 {
    if total_tasks == 0 {
        return 0.0;
    }
    let completion = completed_tasks as f64 / total_tasks as f64;
    let utilization = if total_drones > 0 {
        active_drones as f64 / total_drones as f64
    } else {
        0.0
    };
    let conflict_penalty = (1.0 - conflicts as f64 / total_tasks as f64).max(0.0);
    (completion * 0.5 + utilization * 0.3 + conflict_penalty * 0.2) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_without_tasks_is_zero() {
        assert_eq!(efficiency(0, 0, 3, 1, 0), 0.0);
    }

    #[test]
    fn efficiency_weights() {
        // all done, nobody busy, no conflicts: 50 + 0 + 20
        assert!((efficiency(10, 10, 2, 0, 0) - 70.0).abs() < 1e-9);
        // half done, half busy, conflicts saturate the penalty
        assert!((efficiency(4, 2, 2, 1, 9) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn report_serializes_flat() {
        let report = MetricsReport {
            counters: Metrics {
                total_assignments: 3,
                ..Metrics::default()
            },
            total_drones: 2,
            active_drones: 1,
            idle_drones: 1,
            total_tasks: 4,
            completed_tasks: 1,
            pending_tasks: 2,
            assigned_tasks: 1,
            average_task_time_ms: 5000.0,
            estimated_completion_ms: None,
        };
        let v: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(v["total_assignments"], 3);
        assert_eq!(v["pending_tasks"], 2);
        assert!(v["estimated_completion_ms"].is_null());
    }
}
