/// Level content: the built-in maze and random hazard/pickup placement.
///
/// Obstacles and diamonds are scattered uniformly over the canvas. The
/// caller owns the RNG, so a seeded session regenerates the same layout.
///
/// Obstacles are re-rolled when they land within `spawn_clearance` of the
/// player's start (touching it would end the run before the first tick).
/// After `MAX_REROLLS` attempts the last roll is kept, so the requested
/// count is always produced exactly.

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::entity::{Diamond, Obstacle, Point, Wall};

const MAX_REROLLS: usize = 32;

/// The classic maze: an outer frame, inner corridors and two slanted bars.
/// Slanted bars are drawn rotated but block as their unrotated rectangle.
pub fn builtin_maze() -> Vec<Wall> {
    vec![
        Wall::new(50.0, 50.0, 700.0, 10.0),   // top
        Wall::new(50.0, 650.0, 700.0, 10.0),  // bottom
        Wall::new(50.0, 50.0, 10.0, 600.0),   // left
        Wall::new(740.0, 50.0, 10.0, 600.0),  // right
        Wall::new(250.0, 150.0, 300.0, 10.0),
        Wall::new(250.0, 400.0, 10.0, 250.0),
        Wall::new(400.0, 250.0, 10.0, 250.0),
        Wall::new(100.0, 500.0, 400.0, 10.0),
        Wall::new(300.0, 100.0, 200.0, 10.0).rotated(45.0),
        Wall::new(500.0, 300.0, 150.0, 10.0).rotated(-45.0),
    ]
}

/// Walls for a session: the configured override, or the built-in maze.
pub fn maze_walls(config: &GameConfig) -> Vec<Wall> {
    config.walls.clone().unwrap_or_else(builtin_maze)
}

fn random_point<R: Rng>(rng: &mut R, width: f32, height: f32) -> Point {
    Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height))
}

pub fn spawn_obstacles<R: Rng>(rng: &mut R, config: &GameConfig) -> Vec<Obstacle> {
    let arena = &config.arena;
    let balance = &config.balance;
    let keep_clear = config.actors.player_start;
    let radius = balance.obstacle_size / 2.0;
    let min_dist = balance.spawn_clearance + radius;

    (0..balance.obstacle_count)
        .map(|_| {
            let mut center = random_point(rng, arena.width, arena.height);
            for _ in 0..MAX_REROLLS {
                if center.distance(keep_clear) >= min_dist {
                    break;
                }
                center = random_point(rng, arena.width, arena.height);
            }
            Obstacle { center, radius }
        })
        .collect()
}

pub fn spawn_diamonds<R: Rng>(rng: &mut R, config: &GameConfig) -> Vec<Diamond> {
    (0..config.balance.diamond_count)
        .map(|_| Diamond { pos: random_point(rng, config.arena.width, config.arena.height) })
        .collect()
}
