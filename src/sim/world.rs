/// World: the maze, the authoritative game state and the session RNG.
///
/// ## Ownership
///
/// `World` is the single writer. The tick (`step::step`) and the input
/// handler (`step::move_player`) both take `&mut World` and run on the same
/// thread, so they can never interleave. The renderer only ever sees
/// `&World`.
///
/// ## Lifecycle
///
///   - `World::new` builds the maze once and a fresh `GameState`.
///   - A loss rebuilds the whole `GameState` (`reset_session`), then marks
///     it `Terminal::Lost`.
///   - A win freezes the state as-is.
///   - `restart` is the external "play again": a fresh state, terminal
///     cleared.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;
use crate::domain::entity::{Diamond, Obstacle, Point};
use crate::domain::grid::Maze;
use super::level;

/// Session outcome. Once not `None`, the simulation stops mutating state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Terminal {
    #[default]
    None,
    Lost,
    Won,
}

impl Terminal {
    pub fn is_over(self) -> bool {
        self != Terminal::None
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Landing screen; nothing simulates.
    Title,
    Playing,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Point,
    pub monster: Point,
    pub goal: Point,
    pub obstacles: Vec<Obstacle>,
    pub diamonds: Vec<Diamond>,
    pub score: u32,
    pub terminal: Terminal,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl GameState {
    /// Defaults from config plus freshly rolled obstacles and diamonds.
    pub fn fresh<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        GameState {
            player: config.actors.player_start,
            monster: config.actors.monster_start,
            goal: config.actors.goal,
            obstacles: level::spawn_obstacles(rng, config),
            diamonds: level::spawn_diamonds(rng, config),
            score: 0,
            terminal: Terminal::None,
            message: String::new(),
            message_timer: 0,
        }
    }
}

pub struct World {
    pub config: GameConfig,
    pub maze: Maze,
    pub state: GameState,
    pub phase: Phase,
    pub tick: u64,
    pub seed: u64,
    rng: ChaCha8Rng,
}

impl World {
    /// New world seeded from config, or randomly when no seed is set.
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let maze = Maze::new(
            level::maze_walls(&config),
            config.arena.grid_cols,
            config.arena.grid_rows,
            config.arena.cell_size,
            (config.arena.width, config.arena.height),
        );
        let state = GameState::fresh(&config, &mut rng);
        World {
            config,
            maze,
            state,
            phase: Phase::Title,
            tick: 0,
            seed,
            rng,
        }
    }

    /// Rebuild the game state from scratch (score 0, default positions,
    /// new obstacles and diamonds). The maze is untouched.
    pub fn reset_session(&mut self) {
        self.state = GameState::fresh(&self.config, &mut self.rng);
    }

    /// Start over after a win or loss.
    pub fn restart(&mut self) {
        self.reset_session();
        self.phase = Phase::Playing;
        tracing::info!(tick = self.tick, "session restarted");
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.state.message = msg.to_string();
        self.state.message_timer = duration;
    }

    /// Count the transient message down by one tick; clear it at zero.
    pub fn tick_message(&mut self) {
        if self.state.message_timer > 0 {
            self.state.message_timer -= 1;
            if self.state.message_timer == 0 {
                self.state.message.clear();
            }
        }
    }
}
