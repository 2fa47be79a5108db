/// Monster AI: A* shortest path over the occupancy grid.
///
/// The monster is greedy: every tick it re-plans from scratch toward the
/// player's current cell and takes the first step of that plan.
///
/// Search state (g scores, parents, open set) is local to each call, so
/// the `Grid` is never written to and stale scores cannot leak between
/// searches.
///
/// ## Open set ordering
///
/// `OpenNode` derives `Ord` over `(f, h, row, col)`, so the node expanded
/// next is the one with the lowest f; among equal f the one closest to the
/// goal (lowest h, i.e. deepest g); then lowest row; then lowest column.
/// This makes every path fully deterministic for a given grid.

use std::collections::{BTreeSet, HashMap};

use super::entity::Point;
use super::grid::{Cell, Grid};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
struct OpenNode {
    f: u32,
    h: u32,
    row: usize,
    col: usize,
}

impl OpenNode {
    fn cell(&self) -> Cell {
        Cell::new(self.col, self.row)
    }
}

/// Manhattan distance: admissible and consistent for 4-way unit moves.
pub fn manhattan(a: Cell, b: Cell) -> u32 {
    (a.col.abs_diff(b.col) + a.row.abs_diff(b.row)) as u32
}

/// Shortest path from `start` to `goal`, both inclusive.
///
/// Returns an empty vec when no path exists (goal walled off, or either end
/// outside the grid). `start == goal` yields `[start]`.
pub fn find_path(grid: &Grid, start: Cell, goal: Cell) -> Vec<Cell> {
    if !grid.contains(start) || !grid.contains(goal) {
        return Vec::new();
    }

    let mut open: BTreeSet<OpenNode> = BTreeSet::new();
    let mut g_score: HashMap<Cell, u32> = HashMap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();

    let h = manhattan(start, goal);
    g_score.insert(start, 0);
    open.insert(OpenNode { f: h, h, row: start.row, col: start.col });

    while let Some(node) = open.pop_first() {
        let current = node.cell();
        let g = match g_score.get(&current) {
            Some(&g) => g,
            None => continue,
        };
        // Superseded entry: a cheaper route to this cell was queued later.
        if node.f - node.h > g {
            continue;
        }

        if current == goal {
            return reconstruct(&came_from, current);
        }

        for next in grid.neighbors(current) {
            let tentative = g + 1;
            let known = g_score.get(&next).copied().unwrap_or(u32::MAX);
            if tentative < known {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                let h = manhattan(next, goal);
                open.insert(OpenNode { f: tentative + h, h, row: next.row, col: next.col });
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, mut current: Cell) -> Vec<Cell> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

// ── Chase ──

/// Next position for a chaser at `from` hunting a target at `to`.
///
/// Both points are snapped to their (clamped) cells. Returns the canvas
/// center of the first cell after the start, or `None` when there is no
/// path or the chaser already shares the target's cell.
pub fn chase_step(grid: &Grid, from: Point, to: Point) -> Option<Point> {
    let path = find_path(grid, grid.cell_at(from), grid.cell_at(to));
    path.get(1).map(|&next| grid.center_of(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::tests::grid_from;
    use std::collections::VecDeque;

    /// Reference BFS distance (edges) or None if unreachable.
    fn bfs_distance(grid: &Grid, start: Cell, goal: Cell) -> Option<usize> {
        let mut dist: HashMap<Cell, usize> = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);
        while let Some(c) = queue.pop_front() {
            if c == goal {
                return dist.get(&c).copied();
            }
            let d = dist[&c];
            for n in grid.neighbors(c) {
                if !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn assert_valid_path(grid: &Grid, path: &[Cell], start: Cell, goal: Cell) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert_eq!(manhattan(pair[0], pair[1]), 1, "non-adjacent step {:?}", pair);
        }
        for c in &path[1..] {
            assert!(!grid.is_wall(*c), "path crosses wall at {:?}", c);
        }
    }

    #[test]
    fn open_3x3_corner_to_corner() {
        let g = Grid::open(3, 3, 25);
        let path = find_path(&g, Cell::new(0, 0), Cell::new(2, 2));
        assert_eq!(path.len(), 5);
        assert_valid_path(&g, &path, Cell::new(0, 0), Cell::new(2, 2));
    }

    #[test]
    fn same_cell_is_single_step_path() {
        let g = Grid::open(3, 3, 25);
        let path = find_path(&g, Cell::new(1, 1), Cell::new(1, 1));
        assert_eq!(path, vec![Cell::new(1, 1)]);
    }

    #[test]
    fn walled_in_goal_is_unreachable() {
        let g = grid_from(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        assert!(find_path(&g, Cell::new(0, 0), Cell::new(2, 2)).is_empty());
        // and from inside out
        assert!(find_path(&g, Cell::new(2, 2), Cell::new(4, 4)).is_empty());
    }

    #[test]
    fn wall_goal_is_unreachable() {
        let g = grid_from(&[
            "...",
            ".#.",
            "...",
        ]);
        assert!(find_path(&g, Cell::new(0, 0), Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn out_of_grid_endpoints_give_empty_path() {
        let g = Grid::open(3, 3, 25);
        assert!(find_path(&g, Cell::new(5, 0), Cell::new(0, 0)).is_empty());
        assert!(find_path(&g, Cell::new(0, 0), Cell::new(0, 3)).is_empty());
    }

    #[test]
    fn detours_around_wall() {
        let g = grid_from(&[
            ".....",
            "####.",
            ".....",
        ]);
        let start = Cell::new(0, 0);
        let goal = Cell::new(0, 2);
        let path = find_path(&g, start, goal);
        assert_valid_path(&g, &path, start, goal);
        // 4 right, 2 down, 4 left
        assert_eq!(path.len() - 1, 10);
    }

    #[test]
    fn matches_bfs_on_open_grids() {
        for (w, h) in [(1, 1), (2, 5), (4, 4), (7, 3), (10, 10)] {
            let g = Grid::open(w, h, 25);
            for sc in 0..w {
                for sr in 0..h {
                    let start = Cell::new(sc, sr);
                    let goal = Cell::new(w - 1 - sc / 2, h - 1 - sr / 2);
                    let path = find_path(&g, start, goal);
                    let expected = bfs_distance(&g, start, goal).unwrap();
                    assert_eq!(path.len() - 1, expected);
                    assert_eq!(expected as u32, manhattan(start, goal));
                }
            }
        }
    }

    #[test]
    fn matches_bfs_in_a_maze() {
        let g = grid_from(&[
            "..#.......",
            "..#.####..",
            "..#....#..",
            "..####.#..",
            "......#...",
            ".####.#.##",
            "......#...",
        ]);
        let start = Cell::new(0, 0);
        for row in 0..g.rows() {
            for col in 0..g.cols() {
                let goal = Cell::new(col, row);
                let path = find_path(&g, start, goal);
                match bfs_distance(&g, start, goal) {
                    Some(d) => {
                        assert_valid_path(&g, &path, start, goal);
                        assert_eq!(path.len() - 1, d, "goal {:?}", goal);
                    }
                    None => assert!(path.is_empty(), "goal {:?}", goal),
                }
            }
        }
    }

    #[test]
    fn repeated_searches_are_identical() {
        let g = grid_from(&[
            "......",
            ".##.#.",
            "......",
            ".#.##.",
            "......",
        ]);
        let first = find_path(&g, Cell::new(0, 0), Cell::new(5, 4));
        // unrelated search in between must not disturb the next one
        let _ = find_path(&g, Cell::new(5, 0), Cell::new(0, 4));
        for _ in 0..5 {
            assert_eq!(find_path(&g, Cell::new(0, 0), Cell::new(5, 4)), first);
        }
        assert_eq!(first.len() - 1, 9);
    }

    #[test]
    fn chase_step_moves_to_adjacent_cell_center() {
        let g = Grid::open(30, 30, 25);
        let monster = Point::new(100.0, 100.0); // cell (4,4)
        let player = Point::new(250.0, 250.0); // cell (10,10)
        let next = chase_step(&g, monster, player).unwrap();
        let cell = g.cell_at(next);
        assert_eq!(manhattan(cell, Cell::new(4, 4)), 1);
        assert_eq!(next, g.center_of(cell));
        assert!(manhattan(cell, Cell::new(10, 10)) < manhattan(Cell::new(4, 4), Cell::new(10, 10)));
    }

    #[test]
    fn chase_step_holds_when_sharing_cell_or_blocked() {
        let g = Grid::open(30, 30, 25);
        assert_eq!(chase_step(&g, Point::new(101.0, 101.0), Point::new(110.0, 120.0)), None);

        let g = grid_from(&[
            ".#.",
            "##.",
            "...",
        ]);
        assert_eq!(chase_step(&g, Point::new(5.0, 5.0), Point::new(60.0, 60.0)), None);
    }
}
