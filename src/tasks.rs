use serde::{Deserialize, Serialize};

use crate::coords::Position;
use crate::drones::DroneId;

pub type TaskId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Assigned,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRequirements {
    pub resource_needed: f64,
    pub time_estimate_ms: f64,
}

impl Default for TaskRequirements {
    fn default() -> Self {
        Self {
            resource_needed: 10.0,
            time_estimate_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub position: Position,
    pub priority: f64,
    pub requirements: TaskRequirements,
    pub state: TaskState,
    pub assigned_drone: Option<DroneId>,
    pub completed_by: Option<DroneId>,
    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
}

impl Task {
    pub fn new(
        id: TaskId,
        position: Position,
        priority: f64,
        requirements: TaskRequirements,
        now_ms: u64,
    ) -> Self {
        Self {
            id,
            position,
            priority,
            requirements,
            state: TaskState::Pending,
            assigned_drone: None,
            completed_by: None,
            created_at_ms: now_ms,
            started_at_ms: None,
            completed_at_ms: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == TaskState::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    /// Time between the drone reaching the task and finishing it.
    pub fn duration_ms(&self) -> Option<u64> {
        match (self.started_at_ms, self.completed_at_ms) {
            (Some(s), Some(c)) => Some(c.saturating_sub(s)),
            _ => None,
        }
    }

    pub fn description(&self) -> String {
        format!(
            "Task #{} at ({:.0},{:.0}) p{}",
            self.id, self.position.x, self.position.y, self.priority
        )
    }
}
