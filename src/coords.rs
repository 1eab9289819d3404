use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves at most `step` units toward `target`, stopping on it.
    pub fn step_toward(&self, target: Position, step: f64) -> Position {
        let dist = self.distance_to(target);
        if dist <= step || dist == 0.0 {
            return target;
        }
        let t = step / dist;
        Position {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Position, // inclusive
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Position, width: f64, height: f64) -> Self {
        assert!(width >= 0.0 && height >= 0.0, "Invalid Rect size");
        Self { origin, width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.origin.x + self.width / 2.0,
            self.origin.y + self.height / 2.0,
        )
    }

    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.origin.x
            && p.x < self.origin.x + self.width
            && p.y >= self.origin.y
            && p.y < self.origin.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn step_toward_stops_on_target() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);
        assert_eq!(a.step_toward(b, 4.0), Position::new(4.0, 0.0));
        assert_eq!(a.step_toward(b, 25.0), b);
    }

    #[test]
    fn rect_center_and_contains() {
        let r = Rect::new(Position::new(100.0, 200.0), 100.0, 100.0);
        assert_eq!(r.center(), Position::new(150.0, 250.0));
        assert!(r.contains(Position::new(100.0, 200.0)));
        assert!(!r.contains(Position::new(200.0, 250.0)));
    }
}
