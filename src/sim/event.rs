/// Events emitted during a simulation step.
/// The presentation and logging layers consume these.

use crate::domain::entity::Point;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    DiamondCollected { at: Point, score: u32 },
    MonsterStepped { to: Point },
    /// No path (or already on the player's cell); the monster held position.
    MonsterStalled,
    ObstacleHit,
    PlayerCaught,
    GoalReached { score: u32 },
}
