/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Loss check (any obstacle, or the monster) → full reset, Lost
///   2. Goal check → Won, state frozen
///   3. Diamond pickup
///   4. Monster advances one path step toward the player
///
/// A tick on a finished session (`terminal != None`) or outside the
/// Playing phase does nothing.
///
/// Player movement is not part of the tick: it happens per key press in
/// `move_player`, serialized with the tick on the same thread.

use crate::domain::ai;
use crate::domain::entity::MoveDir;
use crate::domain::physics;
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{Phase, Terminal, World};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.state.terminal.is_over() {
        return vec![];
    }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    if resolve_loss(world, &mut events) { return events; }
    if resolve_goal(world, &mut events) { return events; }
    resolve_diamond_pickup(world, &mut events);
    resolve_monster(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Terminal checks
// ══════════════════════════════════════════════════════════════

fn resolve_loss(world: &mut World, events: &mut Vec<GameEvent>) -> bool {
    let s = &world.state;
    let actors = &world.config.actors;
    let balance = &world.config.balance;

    let hit = physics::hits_obstacle(s.player, actors.player_radius, &s.obstacles);
    let caught = physics::within(s.player, s.monster, balance.catch_radius);
    if !hit && !caught {
        return false;
    }

    if hit { events.push(GameEvent::ObstacleHit); }
    if caught { events.push(GameEvent::PlayerCaught); }

    world.reset_session();
    world.state.terminal = Terminal::Lost;
    true
}

fn resolve_goal(world: &mut World, events: &mut Vec<GameEvent>) -> bool {
    let s = &world.state;
    if !physics::within(s.player, s.goal, world.config.balance.goal_radius) {
        return false;
    }

    let score = s.score;
    world.state.terminal = Terminal::Won;
    events.push(GameEvent::GoalReached { score });
    true
}

// ══════════════════════════════════════════════════════════════
// Pickups
// ══════════════════════════════════════════════════════════════

fn resolve_diamond_pickup(world: &mut World, events: &mut Vec<GameEvent>) {
    let diamonds = std::mem::take(&mut world.state.diamonds);
    let (kept, collected) = physics::collect_diamonds(
        world.state.player,
        world.config.balance.pickup_radius,
        diamonds,
    );
    world.state.diamonds = kept;

    if collected.is_empty() { return; }

    for d in &collected {
        world.state.score += 1;
        events.push(GameEvent::DiamondCollected { at: d.pos, score: world.state.score });
    }
    let msg = format!("Diamond collected! Total Points: {}", world.state.score);
    let ticks = world.config.message_ticks();
    world.set_message(&msg, ticks);
}

// ══════════════════════════════════════════════════════════════
// Monster
// ══════════════════════════════════════════════════════════════

fn resolve_monster(world: &mut World, events: &mut Vec<GameEvent>) {
    let grid = world.maze.grid();
    match ai::chase_step(grid, world.state.monster, world.state.player) {
        Some(next) => {
            world.state.monster = next;
            events.push(GameEvent::MonsterStepped { to: next });
        }
        None => events.push(GameEvent::MonsterStalled),
    }
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

/// Apply one directional key press to the player.
///
/// Returns `true` if the player moved. Rejected when the session is over,
/// not playing, or the clamped candidate overlaps a wall.
pub fn move_player(world: &mut World, dir: MoveDir) -> bool {
    if world.phase != Phase::Playing || world.state.terminal.is_over() {
        return false;
    }

    let move_rules = world.config.move_rules();
    match rules::try_move(world.state.player, dir, &move_rules, world.maze.walls()) {
        Some(next) => {
            world.state.player = next;
            true
        }
        None => false,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
