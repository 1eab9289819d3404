use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coords::{Position, Rect};
use crate::drones::DroneId;
use crate::tasks::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectorId {
    pub row: u32,
    pub col: u32,
}

impl SectorId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub bounds: Rect,
    /// Outstanding (pending or assigned) tasks located here.
    pub tasks: BTreeSet<TaskId>,
    /// Drones whose last reported position lies here.
    pub drones: BTreeSet<DroneId>,
    pub completed: bool,
}

/// Largest number of cells along either grid axis.
pub const MAX_GRID_SIDE: u32 = 4096;

/// Cells needed to cover `extent` with cells of `size`, at least one.
pub fn cells_along(extent: f64, size: f64) -> u32 {
    let n = (extent / size).ceil();
    if n.is_nan() || n < 1.0 {
        1
    } else if n >= MAX_GRID_SIDE as f64 {
        MAX_GRID_SIDE
    } else {
        n as u32
    }
}

/// Uniform grid over the operating field. Built once, never resized.
#[derive(Debug, Clone)]
pub struct SectorGrid {
    cols: u32,
    rows: u32,
    size: f64,
    sectors: Vec<Sector>,
}

impl SectorGrid {
    /// Never panics: a non-positive `size` yields a single cell covering the
    /// field and each axis is capped at `MAX_GRID_SIDE`. Check the config with
    /// `DispatcherConfig::validate` to reject such values instead.
    pub fn new(field_width: f64, field_height: f64, size: f64) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size
        } else {
            field_width.max(field_height).max(1.0)
        };
        let cols = cells_along(field_width, size);
        let rows = cells_along(field_height, size);
        let mut sectors = Vec::with_capacity(cols as usize * rows as usize);
        for row in 0..rows {
            for col in 0..cols {
                sectors.push(Sector {
                    id: SectorId::new(row, col),
                    bounds: Rect::new(
                        Position::new(col as f64 * size, row as f64 * size),
                        size,
                        size,
                    ),
                    tasks: BTreeSet::new(),
                    drones: BTreeSet::new(),
                    completed: false,
                });
            }
        }
        Self {
            cols,
            rows,
            size,
            sectors,
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }
    pub fn rows(&self) -> u32 {
        self.rows
    }
    pub fn len(&self) -> usize {
        self.sectors.len()
    }
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    fn index(&self, id: SectorId) -> Option<usize> {
        if id.row >= self.rows || id.col >= self.cols {
            return None;
        }
        Some((id.row * self.cols + id.col) as usize)
    }

    /// Cell containing `p`; positions off the field clamp to the nearest edge cell.
    pub fn sector_for(&self, p: Position) -> SectorId {
        let clamp = |v: f64, max: u32| -> u32 {
            let cell = (v / self.size).floor();
            if cell.is_nan() || cell < 0.0 {
                0
            } else {
                (cell as u32).min(max - 1)
            }
        };
        SectorId::new(clamp(p.y, self.rows), clamp(p.x, self.cols))
    }

    pub fn get(&self, id: SectorId) -> Option<&Sector> {
        self.index(id).map(|i| &self.sectors[i])
    }

    pub fn get_mut(&mut self, id: SectorId) -> Option<&mut Sector> {
        let i = self.index(id)?;
        Some(&mut self.sectors[i])
    }

    pub fn at(&self, p: Position) -> &Sector {
        let i = self.index(self.sector_for(p)).unwrap_or(0);
        &self.sectors[i]
    }

    pub fn at_mut(&mut self, p: Position) -> &mut Sector {
        let i = self.index(self.sector_for(p)).unwrap_or(0);
        &mut self.sectors[i]
    }

    /// Empties every cell, keeping the layout.
    pub fn clear(&mut self) {
        for s in &mut self.sectors {
            s.tasks.clear();
            s.drones.clear();
            s.completed = false;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.iter()
    }

    /// Outstanding tasks per drone present in the sector holding `p`.
    pub fn load(&self, p: Position) -> f64 {
        let s = self.at(p);
        let tasks = s.tasks.len() as f64;
        match s.drones.len() {
            0 => tasks,
            n => tasks / n as f64,
        }
    }

    /// Moves `drone` between drone sets. Returns true if it changed sector.
    pub fn move_drone(&mut self, drone: DroneId, from: SectorId, to: SectorId) -> bool {
        if from == to {
            return false;
        }
        if let Some(s) = self.get_mut(from) {
            s.drones.remove(&drone);
        }
        if let Some(s) = self.get_mut(to) {
            s.drones.insert(drone);
        }
        true
    }
}
