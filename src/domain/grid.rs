/// Occupancy grid: the discrete space the monster navigates.
///
/// ## Two coordinate spaces
///
///   - canvas space: continuous pixels (`Point`, `Rect`)
///   - grid space:   integer `Cell { col, row }`, `cell_size` pixels per edge
///
/// `cell_at()` maps canvas → grid and is always clamped into the grid, so a
/// position on the far canvas edge never produces an out-of-range index.
/// `center_of()` maps grid → canvas (cell center).
///
/// ## Immutability
///
/// A `Grid` only records which cells are walls. Search bookkeeping (g/f
/// scores, parents) lives in the pathfinder, per call, so one grid can be
/// shared by any number of searches. `Maze` rebuilds the grid whenever the
/// wall list is replaced.

use super::entity::{Point, Wall};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(col: usize, row: usize) -> Self {
        Cell { col, row }
    }
}

/// Neighbor order: up, down, left, right.
const DIRS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cell_size: u32,
    /// Row-major: `walls[row * cols + col]`.
    walls: Vec<bool>,
}

impl Grid {
    /// A grid with no walls.
    pub fn open(cols: usize, rows: usize, cell_size: u32) -> Self {
        Grid { cols, rows, cell_size, walls: vec![false; cols * rows] }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col < self.cols && cell.row < self.rows
    }

    /// Out-of-range cells read as walls.
    #[inline]
    pub fn is_wall(&self, cell: Cell) -> bool {
        if !self.contains(cell) {
            return true;
        }
        self.walls[cell.row * self.cols + cell.col]
    }

    /// Mark a cell as wall. Out-of-range cells are ignored.
    pub fn mark_wall(&mut self, cell: Cell) {
        if self.contains(cell) {
            self.walls[cell.row * self.cols + cell.col] = true;
        }
    }

    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }

    /// Canvas point → containing cell, clamped into the grid.
    pub fn cell_at(&self, p: Point) -> Cell {
        let size = self.cell_size.max(1) as f32;
        let clamp = |v: f32, len: usize| -> usize {
            let idx = (v / size).floor();
            if idx <= 0.0 || len == 0 {
                0
            } else {
                (idx as usize).min(len - 1)
            }
        };
        Cell::new(clamp(p.x, self.cols), clamp(p.y, self.rows))
    }

    /// Cell → canvas point at the cell's center.
    pub fn center_of(&self, cell: Cell) -> Point {
        let size = self.cell_size as f32;
        Point::new(
            cell.col as f32 * size + size / 2.0,
            cell.row as f32 * size + size / 2.0,
        )
    }

    /// Walkable 4-neighbors (up, down, left, right). Walls never appear.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRS.iter().filter_map(move |&(dc, dr)| {
            let col = cell.col as i64 + dc;
            let row = cell.row as i64 + dr;
            if col < 0 || row < 0 {
                return None;
            }
            let next = Cell::new(col as usize, row as usize);
            (self.contains(next) && !self.is_wall(next)).then_some(next)
        })
    }
}

/// Rasterize walls into an occupancy grid.
///
/// Both ends of a wall's span are `floor(edge / size)`, end exclusive:
/// columns `floor(x / size) .. floor((x + width) / size)`, rows likewise.
/// A wall that never reaches the next cell boundary marks nothing along
/// that axis, so walls thinner than a cell may vanish from the grid.
/// Cells past the grid edge are skipped. Rotation is ignored.
pub fn build_grid(walls: &[Wall], cols: usize, rows: usize, cell_size: u32) -> Grid {
    let mut grid = Grid::open(cols, rows, cell_size);
    let size = cell_size.max(1) as f32;

    for wall in walls {
        let r = &wall.rect;
        if r.width <= 0.0 || r.height <= 0.0 {
            continue;
        }
        let (c0, c1) = span(r.x, r.right(), size, cols);
        let (r0, r1) = span(r.y, r.bottom(), size, rows);
        for row in r0..r1 {
            for col in c0..c1 {
                grid.mark_wall(Cell::new(col, row));
            }
        }
    }

    grid
}

/// Index span `[start, end)` covered by `[lo, hi)`, clipped to `[0, len]`.
fn span(lo: f32, hi: f32, size: f32, len: usize) -> (usize, usize) {
    let clip = |v: f32| -> usize {
        if v <= 0.0 {
            0
        } else {
            (v as usize).min(len)
        }
    };
    let start = clip((lo / size).floor());
    let end = clip((hi / size).floor());
    (start, end.max(start))
}

/// Mark every cell whose center lies outside `[0, width) × [0, height)`.
/// Keeps chasers inside the canvas when the grid overhangs it.
pub fn block_outside(grid: &mut Grid, width: f32, height: f32) {
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let cell = Cell::new(col, row);
            let c = grid.center_of(cell);
            if c.x >= width || c.y >= height {
                grid.mark_wall(cell);
            }
        }
    }
}

/// Wall list plus the grid derived from it.
///
/// The grid is the rasterized walls plus every cell hanging off the canvas.
#[derive(Clone, Debug)]
pub struct Maze {
    walls: Vec<Wall>,
    canvas: (f32, f32),
    grid: Grid,
}

impl Maze {
    pub fn new(walls: Vec<Wall>, cols: usize, rows: usize, cell_size: u32, canvas: (f32, f32)) -> Self {
        let mut maze = Maze { walls: vec![], canvas, grid: Grid::open(cols, rows, cell_size) };
        maze.set_walls(walls);
        maze
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Replace the walls and rebuild the grid. Dimensions are kept.
    pub fn set_walls(&mut self, walls: Vec<Wall>) {
        self.walls = walls;
        let mut grid = build_grid(&self.walls, self.grid.cols, self.grid.rows, self.grid.cell_size);
        block_outside(&mut grid, self.canvas.0, self.canvas.1);
        self.grid = grid;
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a grid from ASCII rows: `#` = wall, anything else = open.
    pub(crate) fn grid_from(rows: &[&str]) -> Grid {
        let h = rows.len();
        let w = rows[0].len();
        let mut g = Grid::open(w, h, 25);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    g.mark_wall(Cell::new(x, y));
                }
            }
        }
        g
    }

    fn walls_of(g: &Grid) -> Vec<Cell> {
        let mut out = vec![];
        for row in 0..g.rows() {
            for col in 0..g.cols() {
                if g.is_wall(Cell::new(col, row)) {
                    out.push(Cell::new(col, row));
                }
            }
        }
        out
    }

    #[test]
    fn aligned_wall_marks_covered_cells() {
        let g = build_grid(&[Wall::new(0.0, 0.0, 50.0, 50.0)], 4, 4, 25);
        assert_eq!(
            walls_of(&g),
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 1)]
        );
    }

    #[test]
    fn thin_wall_marks_no_cells() {
        // 10px thick inside row 2: floor(50/25) == floor(60/25)
        let g = build_grid(&[Wall::new(50.0, 50.0, 700.0, 10.0)], 30, 30, 25);
        assert_eq!(g.wall_count(), 0);
    }

    #[test]
    fn builtin_style_thin_walls_leave_grid_open() {
        let walls = [
            Wall::new(50.0, 50.0, 700.0, 10.0),
            Wall::new(50.0, 50.0, 10.0, 600.0),
            Wall::new(250.0, 400.0, 10.0, 250.0),
            Wall::new(100.0, 500.0, 400.0, 10.0),
        ];
        assert_eq!(build_grid(&walls, 30, 30, 25).wall_count(), 0);
    }

    #[test]
    fn partial_cell_is_dropped_on_each_axis() {
        // 0..30 reaches cell 1's boundary but not cell 2's
        let g = build_grid(&[Wall::new(0.0, 0.0, 30.0, 30.0)], 4, 4, 25);
        assert_eq!(walls_of(&g), vec![Cell::new(0, 0)]);

        // x 10..60 → cols 0..2, y 40..70 → rows 1..2
        let g = build_grid(&[Wall::new(10.0, 40.0, 50.0, 30.0)], 4, 4, 25);
        assert_eq!(walls_of(&g), vec![Cell::new(0, 1), Cell::new(1, 1)]);
    }

    #[test]
    fn aligned_wall_marks_floor_span() {
        // cols floor(25/25)..floor(100/25) = 1..4, rows 2..3
        let g = build_grid(&[Wall::new(25.0, 50.0, 75.0, 25.0)], 6, 6, 25);
        assert_eq!(
            walls_of(&g),
            vec![Cell::new(1, 2), Cell::new(2, 2), Cell::new(3, 2)]
        );
    }

    #[test]
    fn out_of_bounds_parts_are_clipped() {
        let g = build_grid(&[Wall::new(-100.0, 50.0, 1000.0, 25.0)], 4, 4, 25);
        assert_eq!(g.wall_count(), 4);
        let g = build_grid(&[Wall::new(500.0, 500.0, 50.0, 50.0)], 4, 4, 25);
        assert_eq!(g.wall_count(), 0);
    }

    #[test]
    fn degenerate_wall_marks_nothing() {
        let g = build_grid(&[Wall::new(10.0, 10.0, 0.0, 40.0)], 4, 4, 25);
        assert_eq!(g.wall_count(), 0);
    }

    #[test]
    fn overlapping_walls_and_rebuild_are_idempotent() {
        let walls = vec![
            Wall::new(0.0, 0.0, 75.0, 25.0),
            Wall::new(25.0, 0.0, 25.0, 75.0),
            Wall::new(0.0, 0.0, 75.0, 25.0),
        ];
        let a = build_grid(&walls, 5, 5, 25);
        let b = build_grid(&walls, 5, 5, 25);
        assert_eq!(a, b);
        assert_eq!(a.wall_count(), 5);
    }

    #[test]
    fn rotation_does_not_change_occupancy() {
        let plain = build_grid(&[Wall::new(300.0, 100.0, 200.0, 50.0)], 30, 30, 25);
        let rotated = build_grid(&[Wall::new(300.0, 100.0, 200.0, 50.0).rotated(45.0)], 30, 30, 25);
        assert_eq!(plain.wall_count(), 16);
        assert_eq!(plain, rotated);
    }

    #[test]
    fn cell_at_floors_and_clamps() {
        let g = Grid::open(30, 30, 25);
        assert_eq!(g.cell_at(Point::new(100.0, 100.0)), Cell::new(4, 4));
        assert_eq!(g.cell_at(Point::new(24.9, 25.0)), Cell::new(0, 1));
        assert_eq!(g.cell_at(Point::new(750.0, 750.0)), Cell::new(29, 29));
        assert_eq!(g.cell_at(Point::new(9000.0, -5.0)), Cell::new(29, 0));
    }

    #[test]
    fn center_round_trips_through_cell_at() {
        let g = Grid::open(30, 30, 25);
        let c = Cell::new(7, 3);
        assert_eq!(g.center_of(c), Point::new(187.5, 87.5));
        assert_eq!(g.cell_at(g.center_of(c)), c);
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let g = grid_from(&[
            ".#.",
            "...",
            "...",
        ]);
        let n: Vec<Cell> = g.neighbors(Cell::new(0, 0)).collect();
        assert_eq!(n, vec![Cell::new(0, 1)]);
        let n: Vec<Cell> = g.neighbors(Cell::new(1, 1)).collect();
        assert_eq!(n, vec![Cell::new(1, 2), Cell::new(0, 1), Cell::new(2, 1)]);
    }

    #[test]
    fn out_of_range_reads_as_wall() {
        let g = Grid::open(2, 2, 25);
        assert!(g.is_wall(Cell::new(2, 0)));
        assert!(!g.is_wall(Cell::new(1, 1)));
    }

    #[test]
    fn maze_set_walls_rebuilds_grid() {
        let mut m = Maze::new(vec![], 4, 4, 25, (100.0, 100.0));
        assert_eq!(m.grid().wall_count(), 0);
        m.set_walls(vec![Wall::new(0.0, 0.0, 25.0, 100.0)]);
        assert_eq!(m.grid().wall_count(), 4);
        assert_eq!(m.walls().len(), 1);
        assert_eq!((m.grid().cols(), m.grid().rows()), (4, 4));
    }

    #[test]
    fn cells_past_the_canvas_are_blocked() {
        // 750×650 canvas over a 30×30 grid: rows 26.. hang off the bottom
        let m = Maze::new(vec![], 30, 30, 25, (750.0, 650.0));
        assert!(!m.grid().is_wall(Cell::new(29, 25)));
        assert!(m.grid().is_wall(Cell::new(0, 26)));
        assert_eq!(m.grid().wall_count(), 4 * 30);
    }
}
