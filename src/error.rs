use thiserror::Error;

use crate::drones::DroneId;
use crate::tasks::TaskId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
	#[error("Unknown drone: {0}")]
	DroneNotFound(DroneId),
	#[error("Unknown task: {0}")]
	TaskNotFound(TaskId),
	#[error("Drone {0} already registered")]
	DuplicateDrone(DroneId),
	#[error("Task {0} already registered")]
	DuplicateTask(TaskId),
	#[error("Task priority must be positive, got {0}")]
	InvalidPriority(f64),
	#[error("Task {task} is claimed by drone {holder}")]
	TaskAlreadyClaimed { task: TaskId, holder: DroneId },
	#[error("Task {0} is already completed")]
	TaskCompleted(TaskId),
	#[error("Drone {drone} is busy with task {task}")]
	DroneBusy { drone: DroneId, task: TaskId },
	#[error("Drone {drone} does not hold task {task}")]
	TaskNotHeld { drone: DroneId, task: TaskId },
	#[error("No eligible drone or task")]
	NoEligibleCandidates,
	#[error("{0}")]
	InvalidConfig(String),
}

impl From<ConfigError> for DispatchError {
	fn from(e: ConfigError) -> Self {
		Self::InvalidConfig(e.to_string())
	}
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Invalid config value for {field}: {reason}")]
	Invalid { field: &'static str, reason: String },
	#[error("Config parse error: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("Config read error: {0}")]
	Io(#[from] std::io::Error),
}
