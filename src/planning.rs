//! Movement plans for groups of drones. Read-only over the dispatcher; the
//! caller decides whether to fly them.

use std::f64::consts::FRAC_PI_6;

use serde::{Deserialize, Serialize};

use crate::coords::{Position, Rect};
use crate::dispatcher::{DispatchResult, Dispatcher};
use crate::drones::DroneId;
use crate::error::DispatchError;
use crate::tasks::TaskId;

pub const FORMATION_SPACING: f64 = 30.0;
pub const SWEEP_ROW_STEP: f64 = 50.0;
pub const SWEEP_LANE_SWITCH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    pub drone: DroneId,
    pub target: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPlan {
    pub drone: DroneId,
    pub path: Vec<Position>,
    pub estimated_time_ms: f64,
}

/// V behind the leader: followers alternate right/left, one row back per pair.
/// Unknown followers are skipped.
pub fn v_formation(
    dispatcher: &Dispatcher,
    leader: DroneId,
    followers: &[DroneId],
) -> DispatchResult<Vec<FormationSlot>> {
    let lead = dispatcher
        .drone(leader)
        .ok_or(DispatchError::DroneNotFound(leader))?;
    let origin = lead.position;
    Ok(followers
        .iter()
        .enumerate()
        .filter(|(_, id)| dispatcher.drone(**id).is_some())
        .map(|(i, &drone)| {
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            let row = (i / 2 + 1) as f64;
            FormationSlot {
                drone,
                target: Position::new(
                    origin.x + side * row * FORMATION_SPACING * FRAC_PI_6.sin(),
                    origin.y - row * FORMATION_SPACING * FRAC_PI_6.cos(),
                ),
            }
        })
        .collect())
}

/// Splits `area` into one vertical lane per drone and zig-zags down each.
pub fn sweep_lines(dispatcher: &Dispatcher, drones: &[DroneId], area: Rect) -> Vec<SweepPlan> {
    if drones.is_empty() {
        return Vec::new();
    }
    let lane = area.width / drones.len() as f64;
    let mut plans = Vec::new();
    for (i, &id) in drones.iter().enumerate() {
        let Some(drone) = dispatcher.drone(id) else {
            continue;
        };
        let start_x = area.origin.x + (i as f64 + 0.5) * lane;
        let mut path = Vec::new();
        let mut y = area.origin.y;
        while y <= area.origin.y + area.height {
            let band = ((y - area.origin.y) / SWEEP_LANE_SWITCH).floor() as i64;
            let x = if band % 2 == 0 {
                start_x
            } else {
                start_x + lane * 0.8
            };
            path.push(Position::new(x, y));
            y += SWEEP_ROW_STEP;
        }
        let estimated_time_ms = path.len() as f64 * 1000.0 / drone.capabilities.speed;
        plans.push(SweepPlan {
            drone: id,
            path,
            estimated_time_ms,
        });
    }
    plans
}

/// Nearest-neighbour visiting order of the pending tasks in the drone's sector.
pub fn optimize_route(dispatcher: &Dispatcher, drone: DroneId) -> DispatchResult<Vec<TaskId>> {
    let d = dispatcher
        .drone(drone)
        .ok_or(DispatchError::DroneNotFound(drone))?;
    let Some(sector) = dispatcher.sectors().get(d.current_sector) else {
        return Ok(Vec::new());
    };
    let mut remaining: Vec<(TaskId, Position)> = sector
        .tasks
        .iter()
        .filter_map(|id| dispatcher.task(*id))
        .filter(|t| t.is_pending())
        .map(|t| (t.id, t.position))
        .collect();

    let mut route = Vec::with_capacity(remaining.len());
    let mut here = d.position;
    while !remaining.is_empty() {
        let mut nearest = 0;
        for (i, (_, p)) in remaining.iter().enumerate() {
            if here.distance_to(*p) < here.distance_to(remaining[nearest].1) {
                nearest = i;
            }
        }
        let (id, p) = remaining.remove(nearest);
        route.push(id);
        here = p;
    }
    Ok(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drones::DroneCapabilities;
    use crate::tasks::TaskRequirements;

    fn fleet(n: u32) -> Dispatcher {
        let mut d = Dispatcher::default();
        for id in 1..=n {
            d.register_drone(
                id,
                Position::new(300.0, 300.0),
                DroneCapabilities::default(),
            )
            .unwrap();
        }
        d
    }

    #[test]
    fn v_formation_alternates_sides() {
        let d = fleet(4);
        let slots = v_formation(&d, 1, &[2, 3, 4, 99]).unwrap();
        assert_eq!(slots.len(), 3);
        assert!((slots[0].target.x - 315.0).abs() < 1e-9);
        assert!((slots[1].target.x - 285.0).abs() < 1e-9);
        assert!((slots[0].target.y - slots[1].target.y).abs() < 1e-9);
        assert!(slots[2].target.y < slots[0].target.y);
        assert!(matches!(
            v_formation(&d, 42, &[1]),
            Err(DispatchError::DroneNotFound(42))
        ));
    }

    #[test]
    fn sweep_lanes_cover_area() {
        let d = fleet(2);
        let area = Rect::new(Position::new(0.0, 0.0), 200.0, 200.0);
        let plans = sweep_lines(&d, &[1, 2], area);
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].path.len(), 5);
        assert_eq!(plans[0].path[0], Position::new(50.0, 0.0));
        assert_eq!(plans[1].path[0], Position::new(150.0, 0.0));
        // second band shifts over
        assert_eq!(plans[0].path[2], Position::new(130.0, 100.0));
        assert_eq!(plans[0].estimated_time_ms, 2500.0);
        assert!(sweep_lines(&d, &[], area).is_empty());
    }

    #[test]
    fn route_visits_nearest_first() {
        let mut d = Dispatcher::default();
        d.register_drone(1, Position::new(0.0, 0.0), DroneCapabilities::default())
            .unwrap();
        let req = TaskRequirements::default();
        d.register_task(1, Position::new(90.0, 0.0), 1.0, req).unwrap();
        d.register_task(2, Position::new(10.0, 0.0), 1.0, req).unwrap();
        d.register_task(3, Position::new(50.0, 0.0), 1.0, req).unwrap();
        d.register_task(4, Position::new(350.0, 0.0), 1.0, req).unwrap();
        assert_eq!(optimize_route(&d, 1).unwrap(), vec![2, 3, 1]);
    }
}
