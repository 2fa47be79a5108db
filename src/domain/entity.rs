/// Entities and shapes in continuous canvas space.
///
/// Everything here is measured in canvas pixels. Grid cells are a
/// separate, coarser space and are derived on demand (see `grid`).

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance.
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A maze wall.
///
/// `rotation` (degrees, clockwise around the rect center) is a drawing
/// hint only. Grid occupancy and collision always use the unrotated `rect`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Wall {
    pub rect: Rect,
    pub rotation: f32,
}

impl Wall {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Wall { rect: Rect::new(x, y, width, height), rotation: 0.0 }
    }

    pub fn rotated(self, degrees: f32) -> Self {
        Wall { rotation: degrees, ..self }
    }
}

/// Static hazard. Touching one ends the run.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Obstacle {
    pub center: Point,
    pub radius: f32,
}

/// Collectible worth one point.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Diamond {
    pub pos: Point,
}

/// Movement direction of a single key press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Unit delta in canvas space (y grows downward).
    pub fn delta(self) -> (f32, f32) {
        match self {
            MoveDir::Left => (-1.0, 0.0),
            MoveDir::Right => (1.0, 0.0),
            MoveDir::Up => (0.0, -1.0),
            MoveDir::Down => (0.0, 1.0),
        }
    }
}
