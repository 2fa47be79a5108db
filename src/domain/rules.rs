/// Player movement rules.
///
/// A key press proposes a candidate position one step along one axis.
/// The candidate is clamped to the canvas (`[0, extent - entity_size]` per
/// axis) and then rejected outright if the entity box overlaps a wall.
/// There is no sliding: a blocked move leaves the player where it was.

use super::entity::{MoveDir, Point, Wall};
use super::physics;

/// Static movement parameters (from config).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveRules {
    pub step: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Far-edge clamp margin.
    pub entity_size: f32,
    /// Half-extent of the box tested against walls.
    pub half_extent: f32,
}

impl MoveRules {
    pub fn max_x(&self) -> f32 {
        (self.canvas_width - self.entity_size).max(0.0)
    }

    pub fn max_y(&self) -> f32 {
        (self.canvas_height - self.entity_size).max(0.0)
    }

    /// Clamp a point into the reachable canvas area.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.max_x()), p.y.clamp(0.0, self.max_y()))
    }
}

/// Position after one step in `dir`, clamped. Walls are not consulted.
pub fn candidate(pos: Point, dir: MoveDir, rules: &MoveRules) -> Point {
    let (dx, dy) = dir.delta();
    rules.clamp(Point::new(pos.x + dx * rules.step, pos.y + dy * rules.step))
}

/// Full move check: the clamped candidate, or `None` if it hits a wall.
pub fn try_move(pos: Point, dir: MoveDir, rules: &MoveRules, walls: &[Wall]) -> Option<Point> {
    let next = candidate(pos, dir, rules);
    if physics::hits_wall(next, rules.half_extent, walls) {
        None
    } else {
        Some(next)
    }
}
