/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::GameConfig;
use error::GameError;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, World};
use ui::input::{InputState, KEYS_BACK, KEYS_CONFIRM, KEYS_QUIT};
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    // The terminal belongs to the renderer, so logging is file-only.
    let _log_guard = match setup_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    let config = GameConfig::load();
    let mut world = World::new(config);
    tracing::info!(
        seed = world.seed,
        walls = world.maze.walls().len(),
        cols = world.maze.grid().cols(),
        rows = world.maze.grid().rows(),
        blocked = world.maze.grid().wall_count(),
        "session start",
    );

    let mut renderer = Renderer::new();
    if let Err(e) = open_screen(&mut renderer) {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        tracing::error!(error = %e, "game loop failed");
        eprintln!("Game error: {e}");
    }

    tracing::info!(score = world.state.score, ticks = world.tick, "session end");
    println!();
    println!("Thanks for playing Maze Chase!");
    println!("Final Score: {}", world.state.score);
}

/// Terminal session setup and teardown.
trait Screen {
    fn init(&mut self) -> io::Result<()>;
    fn cleanup(&mut self) -> io::Result<()>;
}

impl Screen for Renderer {
    fn init(&mut self) -> io::Result<()> {
        Renderer::init(self)
    }

    fn cleanup(&mut self) -> io::Result<()> {
        Renderer::cleanup(self)
    }
}

/// Initialize the screen. On failure the terminal is restored before the
/// error is returned, since raw mode may already be on.
fn open_screen<S: Screen>(screen: &mut S) -> io::Result<()> {
    screen.init().inspect_err(|_| {
        let _ = screen.cleanup();
    })
}

fn game_loop(world: &mut World, renderer: &mut Renderer) -> Result<(), GameError> {
    let mut input = InputState::new();
    let tick_rate = Duration::from_millis(world.config.speed.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        input.drain_events();

        if input.ctrl_c_pressed() {
            break;
        }
        if handle_meta(world, &input) {
            break;
        }

        // Key presses apply immediately, between ticks
        for dir in input.moves() {
            step::move_player(world, dir);
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::step(world);
            log_events(world, &events);
            world.tick_message();
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Screen-level keys. Returns `true` when the player quits.
fn handle_meta(world: &mut World, input: &InputState) -> bool {
    if input.any_pressed(KEYS_QUIT) {
        return true;
    }

    match world.phase {
        Phase::Title => {
            if input.any_pressed(KEYS_CONFIRM) {
                world.restart();
            }
        }
        Phase::Playing => {
            if input.any_pressed(KEYS_BACK) {
                world.phase = Phase::Title;
            } else if world.state.terminal.is_over() && input.any_pressed(KEYS_CONFIRM) {
                world.restart();
            }
        }
    }

    false
}

fn log_events(world: &World, events: &[GameEvent]) {
    let tick = world.tick;
    for event in events {
        match event {
            GameEvent::DiamondCollected { at, score } => {
                tracing::debug!(tick, x = at.x, y = at.y, score, "diamond collected");
            }
            GameEvent::MonsterStepped { to } => {
                tracing::trace!(tick, x = to.x, y = to.y, "monster step");
            }
            GameEvent::MonsterStalled => {
                tracing::debug!(tick, "monster has no step, holding");
            }
            GameEvent::ObstacleHit => tracing::info!(tick, "player hit an obstacle, session reset"),
            GameEvent::PlayerCaught => tracing::info!(tick, "player caught, session reset"),
            GameEvent::GoalReached { score } => tracing::info!(tick, score, "goal reached"),
        }
    }
}

// ── Logging ──

fn setup_logging() -> Result<WorkerGuard, GameError> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "mazechase.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("log file: {}/mazechase.log", log_dir.display());
    Ok(guard)
}

/// `$XDG_STATE_HOME/mazechase`, else `~/.local/state/mazechase`, else `./logs`.
fn log_directory() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(state).join("mazechase");
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".local/state/mazechase");
    }
    PathBuf::from("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeScreen {
        fail_init: bool,
        cleanups: usize,
    }

    impl Screen for FakeScreen {
        fn init(&mut self) -> io::Result<()> {
            if self.fail_init {
                Err(io::Error::new(io::ErrorKind::Other, "alternate screen refused"))
            } else {
                Ok(())
            }
        }

        fn cleanup(&mut self) -> io::Result<()> {
            self.cleanups += 1;
            Ok(())
        }
    }

    #[test]
    fn failed_init_restores_terminal() {
        let mut screen = FakeScreen { fail_init: true, ..Default::default() };
        assert!(open_screen(&mut screen).is_err());
        assert_eq!(screen.cleanups, 1);
    }

    #[test]
    fn successful_init_leaves_terminal_open() {
        let mut screen = FakeScreen::default();
        assert!(open_screen(&mut screen).is_ok());
        assert_eq!(screen.cleanups, 0);
    }
}
