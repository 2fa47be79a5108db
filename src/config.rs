/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// The defaults reproduce the classic layout: a 750×650 canvas over a
/// 30×30 grid of 25px cells, a 300ms tick and the built-in maze.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::entity::{Point, Wall};
use crate::domain::rules::MoveRules;
use crate::error::GameError;

// ── Errors ──

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub arena: ArenaConfig,
    pub actors: ActorConfig,
    pub balance: BalanceConfig,
    pub seed: Option<u64>,
    /// `None` = built-in maze.
    pub walls: Option<Vec<Wall>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub player_step: f32,
    pub message_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
    pub cell_size: u32,
    pub grid_cols: usize,
    pub grid_rows: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActorConfig {
    pub player_start: Point,
    pub monster_start: Point,
    pub goal: Point,
    pub entity_size: f32,
    pub wall_half_extent: f32,
    pub player_radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BalanceConfig {
    pub obstacle_count: usize,
    pub obstacle_size: f32,
    pub diamond_count: usize,
    pub catch_radius: f32,
    pub goal_radius: f32,
    pub pickup_radius: f32,
    pub spawn_clearance: f32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    arena: TomlArena,
    #[serde(default)]
    actors: TomlActors,
    #[serde(default)]
    balance: TomlBalance,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    walls: Option<Vec<TomlWall>>,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_step")]
    player_step: f32,
    #[serde(default = "default_message_ms")]
    message_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlArena {
    #[serde(default = "default_width")]
    width: f32,
    #[serde(default = "default_height")]
    height: f32,
    #[serde(default = "default_cell_size")]
    cell_size: u32,
    #[serde(default = "default_grid_dim")]
    grid_cols: usize,
    #[serde(default = "default_grid_dim")]
    grid_rows: usize,
}

#[derive(Deserialize, Debug)]
struct TomlActors {
    #[serde(default = "default_player_start")]
    player_start: [f32; 2],
    #[serde(default = "default_monster_start")]
    monster_start: [f32; 2],
    #[serde(default = "default_goal")]
    goal: [f32; 2],
    #[serde(default = "default_entity_size")]
    entity_size: f32,
    #[serde(default = "default_half_extent")]
    wall_half_extent: f32,
    #[serde(default = "default_player_radius")]
    player_radius: f32,
}

#[derive(Deserialize, Debug)]
struct TomlBalance {
    #[serde(default = "default_obstacle_count")]
    obstacle_count: usize,
    #[serde(default = "default_obstacle_size")]
    obstacle_size: f32,
    #[serde(default = "default_diamond_count")]
    diamond_count: usize,
    #[serde(default = "default_hit_radius")]
    catch_radius: f32,
    #[serde(default = "default_hit_radius")]
    goal_radius: f32,
    #[serde(default = "default_hit_radius")]
    pickup_radius: f32,
    #[serde(default = "default_spawn_clearance")]
    spawn_clearance: f32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlWall {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    rotation: f32,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 300 }
fn default_player_step() -> f32 { 5.0 }
fn default_message_ms() -> u64 { 2000 }
fn default_width() -> f32 { 750.0 }
fn default_height() -> f32 { 650.0 }
fn default_cell_size() -> u32 { 25 }
fn default_grid_dim() -> usize { 30 }
fn default_player_start() -> [f32; 2] { [250.0, 250.0] }
fn default_monster_start() -> [f32; 2] { [100.0, 100.0] }
fn default_goal() -> [f32; 2] { [650.0, 600.0] }
fn default_entity_size() -> f32 { 20.0 }
fn default_half_extent() -> f32 { 20.0 }
fn default_player_radius() -> f32 { 20.0 }
fn default_obstacle_count() -> usize { 10 }
fn default_obstacle_size() -> f32 { 30.0 }
fn default_diamond_count() -> usize { 5 }
fn default_hit_radius() -> f32 { 30.0 }
fn default_spawn_clearance() -> f32 { 60.0 } // keeps fresh hazards off the start

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_step: default_player_step(),
            message_ms: default_message_ms(),
        }
    }
}

impl Default for TomlArena {
    fn default() -> Self {
        TomlArena {
            width: default_width(),
            height: default_height(),
            cell_size: default_cell_size(),
            grid_cols: default_grid_dim(),
            grid_rows: default_grid_dim(),
        }
    }
}

impl Default for TomlActors {
    fn default() -> Self {
        TomlActors {
            player_start: default_player_start(),
            monster_start: default_monster_start(),
            goal: default_goal(),
            entity_size: default_entity_size(),
            wall_half_extent: default_half_extent(),
            player_radius: default_player_radius(),
        }
    }
}

impl Default for TomlBalance {
    fn default() -> Self {
        TomlBalance {
            obstacle_count: default_obstacle_count(),
            obstacle_size: default_obstacle_size(),
            diamond_count: default_diamond_count(),
            catch_radius: default_hit_radius(),
            goal_radius: default_hit_radius(),
            pickup_radius: default_hit_radius(),
            spawn_clearance: default_spawn_clearance(),
        }
    }
}

fn point(xy: [f32; 2]) -> Point {
    Point::new(xy[0], xy[1])
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: t.speed.tick_rate_ms,
                player_step: t.speed.player_step,
                message_ms: t.speed.message_ms,
            },
            arena: ArenaConfig {
                width: t.arena.width,
                height: t.arena.height,
                cell_size: t.arena.cell_size,
                grid_cols: t.arena.grid_cols,
                grid_rows: t.arena.grid_rows,
            },
            actors: ActorConfig {
                player_start: point(t.actors.player_start),
                monster_start: point(t.actors.monster_start),
                goal: point(t.actors.goal),
                entity_size: t.actors.entity_size,
                wall_half_extent: t.actors.wall_half_extent,
                player_radius: t.actors.player_radius,
            },
            balance: BalanceConfig {
                obstacle_count: t.balance.obstacle_count,
                obstacle_size: t.balance.obstacle_size,
                diamond_count: t.balance.diamond_count,
                catch_radius: t.balance.catch_radius,
                goal_radius: t.balance.goal_radius,
                pickup_radius: t.balance.pickup_radius,
                spawn_clearance: t.balance.spawn_clearance,
            },
            seed: t.general.seed,
            walls: t.walls.map(|ws| {
                ws.into_iter()
                    .map(|w| Wall::new(w.x, w.y, w.width, w.height).rotated(w.rotation))
                    .collect()
            }),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Derived views ──

impl GameConfig {
    pub fn move_rules(&self) -> MoveRules {
        MoveRules {
            step: self.speed.player_step,
            canvas_width: self.arena.width,
            canvas_height: self.arena.height,
            entity_size: self.actors.entity_size,
            half_extent: self.actors.wall_half_extent,
        }
    }

    /// Lifetime of the pickup message in ticks (rounded up, at least 1,
    /// saturating at `u32::MAX`).
    pub fn message_ticks(&self) -> u32 {
        let tick = self.speed.tick_rate_ms.max(1);
        u32::try_from(self.speed.message_ms.div_ceil(tick).max(1)).unwrap_or(u32::MAX)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.speed.tick_rate_ms == 0 {
            return invalid("speed.tick_rate_ms must be positive");
        }
        if !(self.speed.player_step > 0.0) {
            return invalid("speed.player_step must be positive");
        }
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return invalid("arena width/height must be positive");
        }
        if self.arena.cell_size == 0 {
            return invalid("arena.cell_size must be positive");
        }
        if self.arena.grid_cols == 0 || self.arena.grid_rows == 0 {
            return invalid("arena grid must have at least one cell");
        }
        let rules = self.move_rules();
        for (name, p) in [
            ("actors.player_start", self.actors.player_start),
            ("actors.monster_start", self.actors.monster_start),
            ("actors.goal", self.actors.goal),
        ] {
            if rules.clamp(p) != p {
                return Err(ConfigError::Invalid(format!("{name} lies outside the canvas")));
            }
        }
        Ok(())
    }
}

// ── Loading ──

impl GameConfig {
    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str::<TomlConfig>(text)?.into();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse one config file.
    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }

    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) data directories.
    /// A missing file, missing keys or a bad file all fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            return match Self::from_file(&path) {
                Ok(cfg) => {
                    tracing::info!(path = %path.display(), "loaded config");
                    cfg
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "using default settings");
                    GameConfig::default()
                }
            };
        }
        tracing::info!("no config.toml found, using defaults");
        GameConfig::default()
    }
}

/// Candidate directories to search: exe dir + CWD + data paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/mazechase");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    let sys = PathBuf::from("/usr/share/mazechase");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
