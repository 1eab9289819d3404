//! Weighted drone/task cost model. Lower is better.

use crate::config::CostWeights;
use crate::drones::Drone;
use crate::tasks::Task;

/// Cost of `drone` serving `task`, given the load of the task's sector.
pub fn cost(weights: &CostWeights, drone: &Drone, task: &Task, sector_load: f64) -> f64 {
    let distance = drone.position.distance_to(task.position);
    let priority = weights.priority_scale / task.priority;
    let capacity = if drone.can_supply(task.requirements.resource_needed) {
        0.0
    } else {
        weights.capacity_penalty
    };
    let efficiency = weights.efficiency_scale / drone.capabilities.efficiency;

    distance * weights.distance
        + priority * weights.priority
        + capacity * weights.capacity
        + sector_load * weights.sector_load
        + efficiency * weights.efficiency
}

/// A challenger displaces the holder only when clearly cheaper.
pub fn should_preempt(incumbent: f64, challenger: f64, ratio: f64) -> bool {
    challenger <= incumbent * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Position;
    use crate::drones::DroneCapabilities;
    use crate::sectors::SectorId;
    use crate::tasks::TaskRequirements;

    fn drone_at(x: f64, y: f64) -> Drone {
        Drone::new(1, Position::new(x, y), DroneCapabilities::default(), SectorId::new(0, 0), 0)
    }

    fn task_at(x: f64, y: f64, priority: f64) -> Task {
        Task::new(1, Position::new(x, y), priority, TaskRequirements::default(), 0)
    }

    #[test]
    fn reference_weights() {
        let w = CostWeights::default();
        // 0.4*5 + 0.3*100 + 0 + 0.05*2 + 0.05*50
        let c = cost(&w, &drone_at(0.0, 0.0), &task_at(3.0, 4.0, 1.0), 2.0);
        assert!((c - (2.0 + 30.0 + 0.1 + 2.5)).abs() < 1e-9);
    }

    #[test]
    fn higher_priority_is_cheaper() {
        let w = CostWeights::default();
        let d = drone_at(0.0, 0.0);
        let low = cost(&w, &d, &task_at(10.0, 0.0, 1.0), 0.0);
        let high = cost(&w, &d, &task_at(10.0, 0.0, 4.0), 0.0);
        assert!(high < low);
    }

    #[test]
    fn capacity_penalty_dominates() {
        let w = CostWeights::default();
        let mut dry = drone_at(0.0, 0.0);
        dry.resource_level = 5.0;
        let far = drone_at(400.0, 400.0);
        let t = task_at(1.0, 1.0, 1.0);
        assert!(cost(&w, &dry, &t, 0.0) > cost(&w, &far, &t, 0.0));
    }

    #[test]
    fn nearest_only_is_distance() {
        let w = CostWeights::nearest_only();
        let c = cost(&w, &drone_at(0.0, 0.0), &task_at(6.0, 8.0, 3.0), 7.0);
        assert!((c - 10.0).abs() < 1e-9);
    }

    #[test]
    fn preemption_boundary() {
        assert!(!should_preempt(100.0, 81.0, 0.8));
        assert!(should_preempt(100.0, 80.0, 0.8));
        assert!(should_preempt(100.0, 79.0, 0.8));
    }
}
