use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::coords::Position;
use crate::sectors::SectorId;
use crate::tasks::TaskId;

pub type DroneId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DroneStatus {
	Idle,
	Assigned,
	Working,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneCapabilities {
	pub speed: f64,
	pub resource_capacity: f64,
	pub range: f64,
	pub efficiency: f64,
}

impl Default for DroneCapabilities {
	fn default() -> Self {
		Self { speed: 2.0, resource_capacity: 100.0, range: 500.0, efficiency: 1.0 }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
	Assignment,
}

/// Neighbour notification stored in a drone's communication buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
	pub kind: MessageKind,
	pub from: DroneId,
	pub task: TaskId,
	pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
	pub task: TaskId,
	pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
	pub id: DroneId,
	pub position: Position,
	pub status: DroneStatus,
	pub capabilities: DroneCapabilities,
	pub current_task: Option<TaskId>,
	pub current_sector: SectorId,
	pub resource_level: f64,
	pub battery: f64,
	pub tasks_completed: u32,
	pub total_distance: f64,
	pub last_update_ms: u64,
	pub nearby: BTreeSet<DroneId>,
	pub inbox: Vec<Message>,
}

impl Drone {
	pub fn new(id: DroneId, position: Position, capabilities: DroneCapabilities, sector: SectorId, now_ms: u64) -> Self {
		Self {
			id,
			position,
			status: DroneStatus::Idle,
			capabilities,
			current_task: None,
			current_sector: sector,
			resource_level: capabilities.resource_capacity,
			battery: 100.0,
			tasks_completed: 0,
			total_distance: 0.0,
			last_update_ms: now_ms,
			nearby: BTreeSet::new(),
			inbox: Vec::new(),
		}
	}

	pub fn is_idle(&self) -> bool {
		self.status == DroneStatus::Idle
	}

	/// Idle and carrying at least `ratio` of its capacity.
	pub fn is_available(&self, ratio: f64) -> bool {
		self.is_idle() && self.resource_level >= self.capabilities.resource_capacity * ratio
	}

	pub fn can_supply(&self, needed: f64) -> bool {
		self.resource_level >= needed
	}

	pub fn refill(&mut self, amount: f64) {
		self.resource_level = (self.resource_level + amount.max(0.0)).min(self.capabilities.resource_capacity);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn drone_init() {
		let d = Drone::new(1, Position::new(5.0, 5.0), DroneCapabilities::default(), SectorId::new(0, 0), 0);
		assert_eq!(d.id, 1);
		assert_eq!(d.status, DroneStatus::Idle);
		assert!(d.current_task.is_none());
		assert_eq!(d.resource_level, 100.0);
	}

	#[test]
	fn availability_respects_ratio() {
		let mut d = Drone::new(1, Position::default(), DroneCapabilities::default(), SectorId::new(0, 0), 0);
		d.resource_level = 19.0;
		assert!(!d.is_available(0.2));
		d.resource_level = 20.0;
		assert!(d.is_available(0.2));
		d.status = DroneStatus::Assigned;
		assert!(!d.is_available(0.2));
	}

	#[test]
	fn refill_is_capped() {
		let mut d = Drone::new(1, Position::default(), DroneCapabilities::default(), SectorId::new(0, 0), 0);
		d.resource_level = 30.0;
		d.refill(50.0);
		assert_eq!(d.resource_level, 80.0);
		d.refill(500.0);
		assert_eq!(d.resource_level, 100.0);
	}
}
