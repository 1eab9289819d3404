use crate::dispatcher::Dispatcher;
use crate::drones::DroneStatus;
use crate::metrics::MetricsReport;
use crate::tasks::TaskState;

pub fn format_summary(report: &MetricsReport) -> String {
	let eta = report
		.estimated_completion_ms
		.map(|ms| format!("{:.0}ms", ms))
		.unwrap_or_else(|| "-".to_string());
	format!(
		"Tasks: {}/{} done | Pending: {} | Drones busy: {}/{} | Conflicts: {} | Efficiency: {:.1}% | ETA: {}",
		report.completed_tasks,
		report.total_tasks,
		report.pending_tasks,
		report.active_drones,
		report.total_drones,
		report.counters.conflicts,
		report.counters.efficiency,
		eta
	)
}

pub fn format_side_panel(dispatcher: &Dispatcher) -> Vec<String> {
	let mut out = Vec::new();
	out.push("[Drones]".to_string());
	for d in dispatcher.drones() {
		let status = match d.status {
			DroneStatus::Idle => "Idle",
			DroneStatus::Assigned => "En route",
			DroneStatus::Working => "Working",
		};
		let task = d
			.current_task
			.and_then(|id| dispatcher.task(id))
			.map(|t| t.description())
			.unwrap_or_else(|| "None".to_string());
		out.push(format!("Drone #{} – {} – {:.0} left – {}", d.id, status, d.resource_level, task));
	}
	out.push("[Tasks]".to_string());
	for t in dispatcher.tasks() {
		let state = match t.state {
			TaskState::Pending => "Pending",
			TaskState::Assigned => "Assigned",
			TaskState::Completed => "Done",
		};
		out.push(format!("{} – {}", t.description(), state));
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coords::Position;
	use crate::drones::DroneCapabilities;
	use crate::tasks::TaskRequirements;

	#[test]
	fn summary_format() {
		let mut d = Dispatcher::default();
		d.register_drone(1, Position::default(), DroneCapabilities::default()).unwrap();
		d.register_task(1, Position::new(50.0, 50.0), 1.0, TaskRequirements::default()).unwrap();
		let s = format_summary(&d.export_metrics());
		assert!(s.contains("Tasks: 0/1 done"));
		assert!(s.contains("Drones busy: 0/1"));
		assert!(s.contains("ETA: -"));
	}

	#[test]
	fn side_panel_lists_drones_and_tasks() {
		let mut d = Dispatcher::default();
		d.register_drone(1, Position::default(), DroneCapabilities::default()).unwrap();
		d.register_task(3, Position::new(50.0, 50.0), 1.0, TaskRequirements::default()).unwrap();
		d.assign_tasks();
		let lines = format_side_panel(&d);
		assert!(lines.iter().any(|l| l.contains("Drone #1") && l.contains("Task #3")));
		assert!(lines.iter().any(|l| l.contains("Tasks")));
		assert!(lines.iter().any(|l| l.ends_with("Assigned")));
	}
}
