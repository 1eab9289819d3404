//! Headless driver loop: flies drones toward their claims, runs work timers,
//! sends dry drones to the refill station. Stands in for the game loop.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::config::DispatcherConfig;
use crate::coords::Position;
use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::drones::{DroneCapabilities, DroneId, DroneStatus};
use crate::tasks::TaskRequirements;

/// Milliseconds covered by one unit of `DroneCapabilities::speed`.
pub const SPEED_FRAME_MS: f64 = 16.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub assigned: usize,
    pub completed: usize,
    pub refilled: usize,
}

#[derive(Debug)]
pub struct Simulation {
    pub dispatcher: Dispatcher,
    pub station: Position,
    work_ms: BTreeMap<DroneId, f64>,
    frames: u64,
}

impl Simulation {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let cfg = dispatcher.config();
        let station = Position::new(cfg.field_width / 2.0, cfg.field_height / 2.0);
        Self {
            dispatcher,
            station,
            work_ms: BTreeMap::new(),
            frames: 0,
        }
    }

    /// Random field: drones and tasks scattered uniformly, priorities 1..=3.
    pub fn from_seed(
        config: DispatcherConfig,
        drones: u32,
        tasks: u32,
        seed: u64,
    ) -> DispatchResult<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (w, h) = (config.field_width, config.field_height);
        let mut dispatcher = Dispatcher::new(config)?;
        for id in 1..=drones {
            let pos = Position::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            let caps = DroneCapabilities {
                speed: 2.0 + rng.r#gen::<f64>(),
                efficiency: 0.8 + rng.r#gen::<f64>() * 0.2,
                ..DroneCapabilities::default()
            };
            dispatcher.register_drone(id, pos, caps)?;
        }
        for id in 1..=tasks {
            let pos = Position::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
            let priority = rng.gen_range(1..=3) as f64;
            dispatcher.register_task(id, pos, priority, TaskRequirements::default())?;
        }
        Ok(Self::new(dispatcher))
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_done(&self) -> bool {
        self.dispatcher.tasks().all(|t| t.is_completed())
    }

    pub fn step(&mut self, frame_ms: u64) -> DispatchResult<StepReport> {
        self.frames += 1;
        let mut report = StepReport {
            assigned: self.dispatcher.tick(frame_ms).len(),
            ..StepReport::default()
        };
        let ratio = self.dispatcher.config().availability_ratio;
        let proximity = self.dispatcher.config().proximity_threshold;

        let ids: Vec<DroneId> = self.dispatcher.drones().map(|d| d.id).collect();
        for id in ids {
            let Some(drone) = self.dispatcher.drone(id) else {
                continue;
            };
            let step = drone.capabilities.speed * frame_ms as f64 / SPEED_FRAME_MS;
            let here = drone.position;

            match (drone.status, drone.current_task) {
                (DroneStatus::Working, Some(task)) => {
                    let needed = self
                        .dispatcher
                        .task(task)
                        .map_or(0.0, |t| t.requirements.time_estimate_ms);
                    let spent = self.work_ms.entry(id).or_insert(0.0);
                    *spent += frame_ms as f64;
                    if *spent >= needed {
                        self.work_ms.remove(&id);
                        let done = self.dispatcher.complete_task(id, task)?;
                        report.completed += 1;
                        if let Some(next) = done.next_task {
                            debug!(drone = id, next, "picked up next task");
                        }
                    }
                }
                (_, Some(task)) => {
                    let Some(target) = self.dispatcher.task(task).map(|t| t.position) else {
                        continue;
                    };
                    self.dispatcher
                        .update_drone_position(id, here.step_toward(target, step))?;
                }
                (_, None) if !drone.is_available(ratio) => {
                    let next = here.step_toward(self.station, step);
                    self.dispatcher.update_drone_position(id, next)?;
                    if next.distance_to(self.station) < proximity {
                        self.dispatcher.refill(id, f64::INFINITY)?;
                        report.refilled += 1;
                    }
                }
                (_, None) => {}
            }
        }
        Ok(report)
    }

    /// Steps until every task is completed. Returns the frame count, or
    /// `None` if `max_frames` ran out first.
    pub fn run_to_completion(&mut self, frame_ms: u64, max_frames: u64) -> DispatchResult<Option<u64>> {
        while self.frames < max_frames {
            if self.is_done() {
                return Ok(Some(self.frames));
            }
            self.step(frame_ms)?;
        }
        Ok(self.is_done().then_some(self.frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_fields_are_reproducible() {
        let a = Simulation::from_seed(DispatcherConfig::default(), 3, 10, 7).unwrap();
        let b = Simulation::from_seed(DispatcherConfig::default(), 3, 10, 7).unwrap();
        let pa: Vec<Position> = a.dispatcher.tasks().map(|t| t.position).collect();
        let pb: Vec<Position> = b.dispatcher.tasks().map(|t| t.position).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.dispatcher.drones().count(), 3);
    }

    #[test]
    fn invalid_config_fails_to_seed() {
        let config = DispatcherConfig {
            sector_size: 0.0,
            ..DispatcherConfig::default()
        };
        let err = Simulation::from_seed(config, 3, 10, 7).unwrap_err();
        assert!(matches!(err, crate::error::DispatchError::InvalidConfig(_)));
    }

    #[test]
    fn single_drone_finishes_single_task() {
        let mut d = Dispatcher::default();
        d.register_drone(1, Position::new(0.0, 0.0), DroneCapabilities::default())
            .unwrap();
        d.register_task(1, Position::new(60.0, 80.0), 1.0, TaskRequirements::default())
            .unwrap();
        let mut sim = Simulation::new(d);
        let frames = sim.run_to_completion(16, 1_000).unwrap();
        assert!(frames.is_some());
        let task = sim.dispatcher.task(1).unwrap();
        assert_eq!(task.completed_by, Some(1));
        assert!(task.duration_ms().unwrap() >= 1000);
    }

    #[test]
    fn dry_drone_refills_at_station() {
        let mut d = Dispatcher::default();
        d.register_drone(1, Position::new(290.0, 300.0), DroneCapabilities::default())
            .unwrap();
        let mut sim = Simulation::new(d);
        // drain below the availability threshold through a completed task
        sim.dispatcher
            .register_task(1, Position::new(290.0, 300.0), 1.0, TaskRequirements {
                resource_needed: 90.0,
                ..TaskRequirements::default()
            })
            .unwrap();
        sim.dispatcher.assign_task_to_drone(1, 1).unwrap();
        sim.dispatcher
            .update_drone_position(1, Position::new(290.0, 300.0))
            .unwrap();
        sim.dispatcher.complete_task(1, 1).unwrap();
        assert_eq!(sim.dispatcher.drone(1).unwrap().resource_level, 10.0);

        let report = sim.step(16).unwrap();
        assert_eq!(report.refilled, 1);
        assert_eq!(sim.dispatcher.drone(1).unwrap().resource_level, 100.0);
    }
}
