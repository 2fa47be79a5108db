/// Collision detection: pure geometric predicates.
///
/// Nothing here mutates state; callers iterate sets (obstacles, diamonds,
/// walls) and decide what a hit means.
///
/// ## Shapes
///
///   - Entities are circles in canvas space.
///   - Walls are rectangles; rotation is ignored here.
///
/// The entity-vs-rectangle test is an AABB approximation: the rectangle is
/// grown by the entity's half-extent on every side and the center is tested
/// against it. Corners therefore collide a little early.
///
/// Thresholds are passed in by the caller (player radius, catch radius,
/// pickup radius, ...) so balance lives in config, not here.

use super::entity::{Diamond, Obstacle, Point, Rect, Wall};

/// Two circles overlap when their centers are closer than `ra + rb`.
/// Touching exactly is not a hit.
#[inline]
pub fn circle_circle(a: Point, ra: f32, b: Point, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// A point is within `radius` of another (strict).
#[inline]
pub fn within(a: Point, b: Point, radius: f32) -> bool {
    circle_circle(a, radius, b, 0.0)
}

/// AABB overlap of a `2 * half_extent` box centered on `center` with `rect`.
/// Edges that only touch do not overlap.
#[inline]
pub fn circle_rect(center: Point, half_extent: f32, rect: &Rect) -> bool {
    center.x + half_extent > rect.x
        && center.x - half_extent < rect.right()
        && center.y + half_extent > rect.y
        && center.y - half_extent < rect.bottom()
}

// ── Set queries ──

/// Does a circle of `radius` at `center` touch any obstacle?
pub fn hits_obstacle(center: Point, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| circle_circle(center, radius, o.center, o.radius))
}

/// Does the entity box at `center` overlap any wall (unrotated)?
pub fn hits_wall(center: Point, half_extent: f32, walls: &[Wall]) -> bool {
    walls.iter().any(|w| circle_rect(center, half_extent, &w.rect))
}

/// Split diamonds into (kept, collected) by pickup radius around `center`.
pub fn collect_diamonds(
    center: Point,
    pickup_radius: f32,
    diamonds: Vec<Diamond>,
) -> (Vec<Diamond>, Vec<Diamond>) {
    diamonds.into_iter().partition(|d| !within(center, d.pos, pickup_radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    // ── circle_circle ──

    #[test]
    fn circles_overlap_inside_sum_of_radii() {
        assert!(circle_circle(p(0.0, 0.0), 20.0, p(30.0, 0.0), 15.0));
        assert!(!circle_circle(p(0.0, 0.0), 20.0, p(40.0, 0.0), 15.0));
    }

    #[test]
    fn touching_circles_do_not_collide() {
        assert!(!circle_circle(p(0.0, 0.0), 10.0, p(20.0, 0.0), 10.0));
    }

    #[test]
    fn circle_test_is_symmetric() {
        let cases = [
            (p(0.0, 0.0), 20.0, p(25.0, 10.0), 15.0),
            (p(100.0, 100.0), 30.0, p(129.0, 100.0), 0.0),
            (p(100.0, 100.0), 30.0, p(131.0, 100.0), 0.0),
            (p(-5.0, 7.0), 1.0, p(700.0, 600.0), 2.0),
        ];
        for (a, ra, b, rb) in cases {
            assert_eq!(circle_circle(a, ra, b, rb), circle_circle(b, rb, a, ra));
        }
    }

    #[test]
    fn within_is_strict() {
        assert!(within(p(0.0, 0.0), p(25.0, 0.0), 30.0));
        assert!(!within(p(0.0, 0.0), p(30.0, 0.0), 30.0));
        assert!(!within(p(0.0, 0.0), p(18.0, 24.0), 30.0));
        assert!(within(p(0.0, 0.0), p(18.0, 23.0), 30.0));
    }

    // ── circle_rect ──

    #[test]
    fn box_overlaps_expanded_rect() {
        let wall = Rect::new(100.0, 100.0, 10.0, 100.0);
        assert!(circle_rect(p(85.0, 150.0), 20.0, &wall));
        assert!(circle_rect(p(125.0, 150.0), 20.0, &wall));
        assert!(!circle_rect(p(80.0, 150.0), 20.0, &wall)); // edges touch
        assert!(!circle_rect(p(130.0, 150.0), 20.0, &wall));
        assert!(!circle_rect(p(105.0, 70.0), 20.0, &wall));
    }

    #[test]
    fn box_test_is_aabb_not_exact_circle() {
        // Diagonally off the corner: an exact circle misses, the box hits.
        let wall = Rect::new(100.0, 100.0, 10.0, 10.0);
        let c = p(85.0, 85.0);
        assert!(c.distance(p(100.0, 100.0)) > 20.0);
        assert!(circle_rect(c, 20.0, &wall));
    }

    // ── set queries ──

    #[test]
    fn obstacle_hit_uses_both_radii() {
        let obstacles = [Obstacle { center: p(300.0, 300.0), radius: 15.0 }];
        assert!(hits_obstacle(p(266.0, 300.0), 20.0, &obstacles));
        assert!(!hits_obstacle(p(265.0, 300.0), 20.0, &obstacles));
        assert!(!hits_obstacle(p(0.0, 0.0), 20.0, &[]));
    }

    #[test]
    fn rotated_wall_collides_as_unrotated() {
        let walls = [Wall::new(300.0, 100.0, 200.0, 10.0).rotated(45.0)];
        // Inside the unrotated bar, far from where the rotated bar would be.
        assert!(hits_wall(p(480.0, 105.0), 20.0, &walls));
        assert!(!hits_wall(p(400.0, 200.0), 20.0, &walls));
    }

    #[test]
    fn collect_diamonds_splits_by_radius() {
        let diamonds = vec![
            Diamond { pos: p(125.0, 100.0) }, // 25 away
            Diamond { pos: p(130.0, 100.0) }, // exactly 30
            Diamond { pos: p(400.0, 400.0) },
        ];
        let (kept, got) = collect_diamonds(p(100.0, 100.0), 30.0, diamonds);
        assert_eq!(got, vec![Diamond { pos: p(125.0, 100.0) }]);
        assert_eq!(kept.len(), 2);
    }
}
