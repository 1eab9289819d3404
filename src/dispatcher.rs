use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DispatcherConfig;
use crate::coords::Position;
use crate::cost;
use crate::drones::{AssignmentRecord, Drone, DroneCapabilities, DroneId, DroneStatus, Message, MessageKind};
use crate::error::{ConfigError, DispatchError};
use crate::matching;
use crate::metrics::{self, Metrics, MetricsReport};
use crate::sectors::SectorGrid;
use crate::tasks::{Task, TaskId, TaskRequirements, TaskState};

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
	pub drone: DroneId,
	pub task: TaskId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
	Assigned,
	/// The task was taken from `previous` during conflict resolution.
	Preempted { previous: DroneId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
	pub sector_cleared: bool,
	/// Task the completing drone picked up right away, if any.
	pub next_task: Option<TaskId>,
}

/// Owns drones, tasks, sectors and claims, and decides who works on what.
///
/// Driven synchronously by the caller: registrations at setup, then `tick`
/// (or `assign_tasks`) on a cadence, `update_drone_position` every frame and
/// `complete_task` when the caller's work timer ends.
#[derive(Debug)]
pub struct Dispatcher {
	config: DispatcherConfig,
	drones: BTreeMap<DroneId, Drone>,
	tasks: BTreeMap<TaskId, Task>,
	sectors: SectorGrid,
	claims: BTreeMap<TaskId, DroneId>,
	history: BTreeMap<DroneId, Vec<AssignmentRecord>>,
	completed: BTreeSet<TaskId>,
	metrics: Metrics,
	now_ms: u64,
	since_assign_ms: u64,
	since_rebalance_ms: u64,
}

impl Default for Dispatcher {
	fn default() -> Self {
		Self::build(DispatcherConfig::default())
	}
}

impl Dispatcher {
	/// Validates `config` and builds an empty dispatcher over its field.
	pub fn new(config: DispatcherConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::build(config))
	}

	fn build(config: DispatcherConfig) -> Self {
		let sectors = SectorGrid::new(config.field_width, config.field_height, config.sector_size);
		Self {
			config,
			drones: BTreeMap::new(),
			tasks: BTreeMap::new(),
			sectors,
			claims: BTreeMap::new(),
			history: BTreeMap::new(),
			completed: BTreeSet::new(),
			metrics: Metrics::default(),
			now_ms: 0,
			since_assign_ms: 0,
			since_rebalance_ms: 0,
		}
	}

	// ---------- Accessors ----------

	pub fn config(&self) -> &DispatcherConfig {
		&self.config
	}
	pub fn now_ms(&self) -> u64 {
		self.now_ms
	}
	pub fn drone(&self, id: DroneId) -> Option<&Drone> {
		self.drones.get(&id)
	}
	pub fn task(&self, id: TaskId) -> Option<&Task> {
		self.tasks.get(&id)
	}
	pub fn drones(&self) -> impl Iterator<Item = &Drone> {
		self.drones.values()
	}
	pub fn tasks(&self) -> impl Iterator<Item = &Task> {
		self.tasks.values()
	}
	pub fn sectors(&self) -> &SectorGrid {
		&self.sectors
	}
	pub fn completed_tasks(&self) -> &BTreeSet<TaskId> {
		&self.completed
	}
	pub fn metrics(&self) -> &Metrics {
		&self.metrics
	}
	pub fn claim_holder(&self, task: TaskId) -> Option<DroneId> {
		self.claims.get(&task).copied()
	}
	pub fn assignment_history(&self, drone: DroneId) -> &[AssignmentRecord] {
		self.history.get(&drone).map(Vec::as_slice).unwrap_or(&[])
	}
	pub fn nearby_drones(&self, drone: DroneId) -> Option<&BTreeSet<DroneId>> {
		self.drones.get(&drone).map(|d| &d.nearby)
	}

	/// Ids of idle drones holding enough resource to be auto-assigned.
	pub fn available_drones(&self) -> Vec<DroneId> {
		let ratio = self.config.availability_ratio;
		self.drones.values().filter(|d| d.is_available(ratio)).map(|d| d.id).collect()
	}

	/// Pending task ids, highest priority first (ties by id).
	pub fn pending_tasks(&self) -> Vec<TaskId> {
		let mut pending: Vec<&Task> = self.tasks.values().filter(|t| t.is_pending()).collect();
		pending.sort_by(|a, b| b.priority.total_cmp(&a.priority));
		pending.into_iter().map(|t| t.id).collect()
	}

	// ---------- Registration ----------

	pub fn register_drone(
		&mut self,
		id: DroneId,
		position: Position,
		capabilities: DroneCapabilities,
	) -> DispatchResult<&Drone> {
		if self.drones.contains_key(&id) {
			return Err(DispatchError::DuplicateDrone(id));
		}
		let sector = self.sectors.sector_for(position);
		if let Some(s) = self.sectors.get_mut(sector) {
			s.drones.insert(id);
		}
		self.drones.insert(id, Drone::new(id, position, capabilities, sector, self.now_ms));
		self.history.insert(id, Vec::new());
		self.refresh_neighbours(id);
		info!(drone = id, sector = %sector, "drone registered");
		self.drones.get(&id).ok_or(DispatchError::DroneNotFound(id))
	}

	pub fn register_task(
		&mut self,
		id: TaskId,
		position: Position,
		priority: f64,
		requirements: TaskRequirements,
	) -> DispatchResult<&Task> {
		if self.tasks.contains_key(&id) {
			return Err(DispatchError::DuplicateTask(id));
		}
		if !(priority.is_finite() && priority > 0.0) {
			return Err(DispatchError::InvalidPriority(priority));
		}
		let sector = self.sectors.at_mut(position);
		sector.tasks.insert(id);
		sector.completed = false;
		self.tasks.insert(id, Task::new(id, position, priority, requirements, self.now_ms));
		info!(task = id, priority, "task registered");
		self.tasks.get(&id).ok_or(DispatchError::TaskNotFound(id))
	}

	// ---------- Cost ----------

	fn cost_of(&self, drone: &Drone, task: &Task) -> f64 {
		cost::cost(&self.config.weights, drone, task, self.sectors.load(task.position))
	}

	pub fn cost(&self, drone: DroneId, task: TaskId) -> DispatchResult<f64> {
		let d = self.drones.get(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		let t = self.tasks.get(&task).ok_or(DispatchError::TaskNotFound(task))?;
		Ok(self.cost_of(d, t))
	}

	/// Whether `drone` carries enough resource for `task`.
	pub fn is_viable(&self, drone: DroneId, task: TaskId) -> bool {
		match (self.drones.get(&drone), self.tasks.get(&task)) {
			(Some(d), Some(t)) => d.can_supply(t.requirements.resource_needed),
			_ => false,
		}
	}

	// ---------- Assignment ----------

	/// Matches available drones to pending tasks and applies every pair.
	/// Empty when nothing is eligible.
	pub fn assign_tasks(&mut self) -> Vec<Assignment> {
		self.try_assign_tasks().unwrap_or_default()
	}

	/// Like `assign_tasks`, but reports an empty candidate set as
	/// `NoEligibleCandidates` instead of an empty result.
	pub fn try_assign_tasks(&mut self) -> DispatchResult<Vec<Assignment>> {
		let drones = self.available_drones();
		let tasks = self.pending_tasks();
		if drones.is_empty() || tasks.is_empty() {
			return Err(DispatchError::NoEligibleCandidates);
		}

		let matrix: matching::CostMatrix = drones
			.iter()
			.map(|d| {
				let drone = &self.drones[d];
				tasks
					.iter()
					.map(|t| {
						let task = &self.tasks[t];
						if drone.can_supply(task.requirements.resource_needed) {
							self.cost_of(drone, task)
						} else {
							f64::INFINITY
						}
					})
					.collect()
			})
			.collect();

		let mut out = Vec::new();
		for (i, j) in matching::solve(self.config.strategy, &matrix) {
			let (drone, task) = (drones[i], tasks[j]);
			match self.assign_task_to_drone(drone, task) {
				Ok(_) => out.push(Assignment { drone, task }),
				Err(e) => debug!(drone, task, error = %e, "matched pair not applied"),
			}
		}
		Ok(out)
	}

	/// Claims `task` for `drone`. A task held by another drone goes through
	/// conflict resolution instead.
	pub fn assign_task_to_drone(&mut self, drone: DroneId, task: TaskId) -> DispatchResult<AssignOutcome> {
		let d = self.drones.get(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		let t = self.tasks.get(&task).ok_or(DispatchError::TaskNotFound(task))?;
		if t.is_completed() {
			return Err(DispatchError::TaskCompleted(task));
		}
		if let Some(holder) = t.assigned_drone {
			if holder == drone {
				return Ok(AssignOutcome::Assigned);
			}
			self.metrics.conflicts += 1;
			return if self.resolve_conflict(holder, drone, task)? {
				Ok(AssignOutcome::Preempted { previous: holder })
			} else {
				Err(DispatchError::TaskAlreadyClaimed { task, holder })
			};
		}
		if let Some(other) = d.current_task {
			return Err(DispatchError::DroneBusy { drone, task: other });
		}
		self.claim(drone, task);
		Ok(AssignOutcome::Assigned)
	}

	/// Hands `task` from `holder` to `challenger` if the challenger is free,
	/// viable and cheap enough. Returns whether the switch happened.
	pub fn resolve_conflict(&mut self, holder: DroneId, challenger: DroneId, task: TaskId) -> DispatchResult<bool> {
		let h = self.drones.get(&holder).ok_or(DispatchError::DroneNotFound(holder))?;
		let c = self.drones.get(&challenger).ok_or(DispatchError::DroneNotFound(challenger))?;
		let t = self.tasks.get(&task).ok_or(DispatchError::TaskNotFound(task))?;
		if t.assigned_drone != Some(holder) || c.current_task.is_some() || !c.can_supply(t.requirements.resource_needed) {
			warn!(task, holder, challenger, "conflict kept: challenger not eligible");
			return Ok(false);
		}

		let incumbent_cost = self.cost_of(h, t);
		let challenger_cost = self.cost_of(c, t);
		if !cost::should_preempt(incumbent_cost, challenger_cost, self.config.preemption_ratio) {
			warn!(task, holder, challenger, incumbent_cost, challenger_cost, "conflict kept by holder");
			return Ok(false);
		}

		self.unclaim(holder, task);
		self.claim(challenger, task);
		self.metrics.preemptions += 1;
		info!(task, from = holder, to = challenger, "task reassigned after conflict");
		self.find_alternative_task(holder)?;
		Ok(true)
	}

	/// Assigns the cheapest viable pending task to an idle drone.
	pub fn find_alternative_task(&mut self, drone: DroneId) -> DispatchResult<Option<TaskId>> {
		let d = self.drones.get(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		if !d.is_idle() {
			return Ok(None);
		}
		let mut best: Option<(TaskId, f64)> = None;
		for id in self.pending_tasks() {
			let t = &self.tasks[&id];
			if !d.can_supply(t.requirements.resource_needed) {
				continue;
			}
			let c = self.cost_of(d, t);
			if best.is_none_or(|(_, b)| c < b) {
				best = Some((id, c));
			}
		}
		let Some((task, _)) = best else { return Ok(None) };
		self.assign_task_to_drone(drone, task)?;
		Ok(Some(task))
	}

	fn claim(&mut self, drone: DroneId, task: TaskId) {
		let now = self.now_ms;
		if let Some(d) = self.drones.get_mut(&drone) {
			d.current_task = Some(task);
			d.status = DroneStatus::Assigned;
		}
		if let Some(t) = self.tasks.get_mut(&task) {
			t.assigned_drone = Some(drone);
			t.state = TaskState::Assigned;
		}
		self.claims.insert(task, drone);
		self.history.entry(drone).or_default().push(AssignmentRecord { task, timestamp_ms: now });
		self.metrics.total_assignments += 1;
		self.broadcast_assignment(drone, task);
		debug!(drone, task, "task assigned");
	}

	fn unclaim(&mut self, drone: DroneId, task: TaskId) {
		if let Some(d) = self.drones.get_mut(&drone) {
			if d.current_task == Some(task) {
				d.current_task = None;
				d.status = DroneStatus::Idle;
			}
		}
		if let Some(t) = self.tasks.get_mut(&task) {
			if t.assigned_drone == Some(drone) {
				t.assigned_drone = None;
				t.state = TaskState::Pending;
				t.started_at_ms = None;
			}
		}
		self.claims.remove(&task);
	}

	/// Drops the drone's current claim; the task goes back to pending.
	pub fn release_task(&mut self, drone: DroneId) -> DispatchResult<Option<TaskId>> {
		let d = self.drones.get(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		let Some(task) = d.current_task else { return Ok(None) };
		self.unclaim(drone, task);
		info!(drone, task, "assignment released");
		Ok(Some(task))
	}

	// ---------- Progress ----------

	pub fn complete_task(&mut self, drone: DroneId, task: TaskId) -> DispatchResult<Completion> {
		let d = self.drones.get(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		let t = self.tasks.get(&task).ok_or(DispatchError::TaskNotFound(task))?;
		if t.is_completed() {
			return Err(DispatchError::TaskCompleted(task));
		}
		if d.current_task != Some(task) || t.assigned_drone != Some(drone) {
			return Err(DispatchError::TaskNotHeld { drone, task });
		}

		let now = self.now_ms;
		let (position, needed) = {
			let t = self.tasks.get_mut(&task).ok_or(DispatchError::TaskNotFound(task))?;
			t.state = TaskState::Completed;
			t.completed_at_ms = Some(now);
			t.assigned_drone = None;
			t.completed_by = Some(drone);
			(t.position, t.requirements.resource_needed)
		};
		self.claims.remove(&task);
		self.completed.insert(task);

		if let Some(d) = self.drones.get_mut(&drone) {
			d.current_task = None;
			d.status = DroneStatus::Idle;
			d.tasks_completed += 1;
			d.resource_level = (d.resource_level - needed).max(0.0);
		}

		let sector = self.sectors.at_mut(position);
		sector.tasks.remove(&task);
		let sector_cleared = sector.tasks.is_empty();
		if sector_cleared {
			sector.completed = true;
		}
		let sector_id = sector.id;
		info!(drone, task, sector = %sector_id, "task completed");

		if sector_cleared {
			self.optimize_sector_allocation();
		}
		self.refresh_efficiency();

		let next_task = match self.drones.get(&drone).and_then(|d| d.current_task) {
			Some(t) => Some(t),
			None => self.find_alternative_task(drone)?,
		};
		Ok(Completion { sector_cleared, next_task })
	}

	/// Records a movement report; starts work once close enough to the task.
	pub fn update_drone_position(&mut self, drone: DroneId, position: Position) -> DispatchResult<()> {
		let now = self.now_ms;
		let new_sector = self.sectors.sector_for(position);
		let d = self.drones.get_mut(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		d.total_distance += d.position.distance_to(position);
		d.position = position;
		d.last_update_ms = now;
		let old_sector = d.current_sector;
		d.current_sector = new_sector;
		let current_task = d.current_task;
		self.sectors.move_drone(drone, old_sector, new_sector);
		self.refresh_neighbours(drone);

		let Some(task) = current_task else { return Ok(()) };
		let threshold = self.config.proximity_threshold;
		let Some(t) = self.tasks.get_mut(&task) else { return Ok(()) };
		if position.distance_to(t.position) < threshold {
			t.started_at_ms.get_or_insert(now);
			if let Some(d) = self.drones.get_mut(&drone) {
				if d.status == DroneStatus::Assigned {
					d.status = DroneStatus::Working;
					debug!(drone, task, "work started");
				}
			}
		}
		Ok(())
	}

	pub fn refill(&mut self, drone: DroneId, amount: f64) -> DispatchResult<f64> {
		let d = self.drones.get_mut(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		d.refill(amount);
		Ok(d.resource_level)
	}

	/// Sends idle drones toward the sectors with the most pending work.
	pub fn optimize_sector_allocation(&mut self) -> Vec<Assignment> {
		let mut targets: Vec<(usize, Position, Vec<TaskId>)> = self
			.sectors
			.iter()
			.filter(|s| !s.completed)
			.map(|s| {
				let pending: Vec<TaskId> = s
					.tasks
					.iter()
					.copied()
					.filter(|id| self.tasks.get(id).is_some_and(Task::is_pending))
					.collect();
				(pending.len(), s.bounds.center(), pending)
			})
			.filter(|(n, _, _)| *n > 0)
			.collect();
		targets.sort_by(|a, b| b.0.cmp(&a.0));

		let idle: Vec<DroneId> = self.drones.values().filter(|d| d.is_idle()).map(|d| d.id).collect();

		let mut out = Vec::new();
		for (drone, (_, center, pending)) in idle.into_iter().zip(targets) {
			let d = &self.drones[&drone];
			let closest = pending
				.iter()
				.map(|id| &self.tasks[id])
				.filter(|t| d.can_supply(t.requirements.resource_needed))
				.min_by(|a, b| center.distance_to(a.position).total_cmp(&center.distance_to(b.position)))
				.map(|t| t.id);
			if let Some(task) = closest {
				if self.assign_task_to_drone(drone, task).is_ok() {
					out.push(Assignment { drone, task });
				}
			}
		}
		self.metrics.rebalances += 1;
		info!(moved = out.len(), "sector allocation rebalanced");
		out
	}

	/// Advances the clock and runs whatever is due this frame.
	pub fn tick(&mut self, delta_ms: u64) -> Vec<Assignment> {
		self.now_ms += delta_ms;
		self.since_assign_ms += delta_ms;
		let mut out = Vec::new();
		if self.since_assign_ms >= self.config.update_interval_ms {
			self.since_assign_ms %= self.config.update_interval_ms;
			out.extend(self.assign_tasks());
		}
		if let Some(every) = self.config.rebalance_interval_ms {
			self.since_rebalance_ms += delta_ms;
			if self.since_rebalance_ms >= every {
				self.since_rebalance_ms %= every;
				out.extend(self.optimize_sector_allocation());
			}
		}
		out
	}

	// ---------- Teardown ----------

	pub fn remove_drone(&mut self, drone: DroneId) -> DispatchResult<Drone> {
		self.release_task(drone)?;
		let d = self.drones.remove(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		if let Some(s) = self.sectors.get_mut(d.current_sector) {
			s.drones.remove(&drone);
		}
		for other in self.drones.values_mut() {
			other.nearby.remove(&drone);
		}
		self.history.remove(&drone);
		info!(drone, "drone removed");
		Ok(d)
	}

	pub fn remove_task(&mut self, task: TaskId) -> DispatchResult<Task> {
		let t = self.tasks.get(&task).ok_or(DispatchError::TaskNotFound(task))?;
		if t.is_completed() {
			return Err(DispatchError::TaskCompleted(task));
		}
		if let Some(holder) = t.assigned_drone {
			self.unclaim(holder, task);
		}
		let t = self.tasks.remove(&task).ok_or(DispatchError::TaskNotFound(task))?;
		let sector = self.sectors.at_mut(t.position);
		sector.tasks.remove(&task);
		let sector_cleared = sector.tasks.is_empty();
		if sector_cleared {
			sector.completed = true;
		}
		info!(task, "task removed");
		if sector_cleared {
			self.optimize_sector_allocation();
		}
		Ok(t)
	}

	pub fn reset(&mut self) {
		self.drones.clear();
		self.tasks.clear();
		self.claims.clear();
		self.history.clear();
		self.completed.clear();
		self.sectors.clear();
		self.metrics = Metrics::default();
		self.since_assign_ms = 0;
		self.since_rebalance_ms = 0;
		info!("dispatcher reset");
	}

	// ---------- Communication ----------

	fn refresh_neighbours(&mut self, drone: DroneId) {
		let Some(pos) = self.drones.get(&drone).map(|d| d.position) else { return };
		let range = self.config.communication_range;
		let mut near = BTreeSet::new();
		for other in self.drones.values_mut() {
			if other.id == drone {
				continue;
			}
			if pos.distance_to(other.position) <= range {
				near.insert(other.id);
				other.nearby.insert(drone);
			} else {
				other.nearby.remove(&drone);
			}
		}
		if let Some(d) = self.drones.get_mut(&drone) {
			d.nearby = near;
		}
	}

	fn broadcast_assignment(&mut self, drone: DroneId, task: TaskId) {
		let Some(nearby) = self.drones.get(&drone).map(|d| d.nearby.clone()) else { return };
		let message = Message { kind: MessageKind::Assignment, from: drone, task, timestamp_ms: self.now_ms };
		for id in &nearby {
			if let Some(other) = self.drones.get_mut(id) {
				other.inbox.push(message.clone());
			}
		}
		if !nearby.is_empty() {
			debug!(drone, task, receivers = nearby.len(), "assignment broadcast");
		}
	}

	pub fn drain_messages(&mut self, drone: DroneId) -> DispatchResult<Vec<Message>> {
		let d = self.drones.get_mut(&drone).ok_or(DispatchError::DroneNotFound(drone))?;
		Ok(std::mem::take(&mut d.inbox))
	}

	// ---------- Telemetry ----------

	fn active_drones(&self) -> usize {
		self.drones.values().filter(|d| !d.is_idle()).count()
	}

	fn refresh_efficiency(&mut self) -> f64 {
		self.metrics.efficiency = metrics::efficiency(
			self.tasks.len(),
			self.completed.len(),
			self.drones.len(),
			self.active_drones(),
			self.metrics.conflicts,
		);
		self.metrics.efficiency
	}

	/// Mean of `completed - started` over finished tasks that were reached.
	pub fn average_task_time(&self) -> f64 {
		let durations: Vec<u64> = self
			.completed
			.iter()
			.filter_map(|id| self.tasks.get(id))
			.filter_map(Task::duration_ms)
			.collect();
		if durations.is_empty() {
			return self.config.default_task_time_ms;
		}
		durations.iter().sum::<u64>() as f64 / durations.len() as f64
	}

	pub fn predict_completion_time(&self) -> Option<f64> {
		let active = self.active_drones();
		if active == 0 {
			return None;
		}
		let pending = self.tasks.values().filter(|t| t.is_pending()).count();
		Some(pending as f64 / active as f64 * self.average_task_time())
	}

	pub fn export_metrics(&self) -> MetricsReport {
		let active = self.active_drones();
		let count = |s: TaskState| self.tasks.values().filter(|t| t.state == s).count();
		MetricsReport {
			counters: self.metrics.clone(),
			total_drones: self.drones.len(),
			active_drones: active,
			idle_drones: self.drones.len() - active,
			total_tasks: self.tasks.len(),
			completed_tasks: self.completed.len(),
			pending_tasks: count(TaskState::Pending),
			assigned_tasks: count(TaskState::Assigned),
			average_task_time_ms: self.average_task_time(),
			estimated_completion_ms: self.predict_completion_time(),
		}
	}

	/// Cross-registry consistency problems; empty when every invariant holds.
	pub fn invariant_violations(&self) -> Vec<String> {
		let mut out = Vec::new();
		for t in self.tasks.values() {
			if self.claims.get(&t.id).copied() != t.assigned_drone {
				out.push(format!("task {} claim table disagrees with assigned drone", t.id));
			}
			if let Some(d) = t.assigned_drone {
				if self.drones.get(&d).and_then(|d| d.current_task) != Some(t.id) {
					out.push(format!("task {} held by drone {} which does not point back", t.id, d));
				}
			}
			if t.is_completed() != self.completed.contains(&t.id) {
				out.push(format!("task {} completed set mismatch", t.id));
			}
			if t.is_completed() && t.assigned_drone.is_some() {
				out.push(format!("completed task {} still assigned", t.id));
			}
		}
		for d in self.drones.values() {
			if let Some(task) = d.current_task {
				if self.tasks.get(&task).and_then(|t| t.assigned_drone) != Some(d.id) {
					out.push(format!("drone {} points at task {} which does not hold it", d.id, task));
				}
			}
			if d.current_task.is_some() == d.is_idle() {
				out.push(format!("drone {} status {:?} disagrees with current task", d.id, d.status));
			}
			let homes = self.sectors.iter().filter(|s| s.drones.contains(&d.id)).count();
			if homes != 1 || self.sectors.sector_for(d.position) != d.current_sector {
				out.push(format!("drone {} sector membership is stale", d.id));
			}
		}
		out
	}
}
