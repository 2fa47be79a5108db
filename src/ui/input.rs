/// Keyboard input collector.
///
/// Movement is edge-driven: every Press or Repeat event is one step, applied
/// in arrival order. There is no held-key state, so holding an arrow key
/// moves at the terminal's key-repeat rate.
///
/// Release events are ignored (terminals without keyboard enhancement never
/// send them anyway).

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' ')];
pub const KEYS_BACK: &[KeyCode] = &[KeyCode::Esc];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map a key to a movement direction.
pub fn move_dir(code: KeyCode) -> Option<MoveDir> {
    if KEYS_LEFT.contains(&code) {
        Some(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Some(MoveDir::Right)
    } else if KEYS_UP.contains(&code) {
        Some(MoveDir::Up)
    } else if KEYS_DOWN.contains(&code) {
        Some(MoveDir::Down)
    } else {
        None
    }
}

pub struct InputState {
    /// Press/Repeat key codes from the most recent drain, in order.
    presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before handling keys.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key);
            }
        }
    }

    fn record(&mut self, key: KeyEvent) {
        self.raw_events.push(key);
        if key.kind != KeyEventKind::Release {
            self.presses.push(key.code);
        }
    }

    /// Directional presses this frame, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = MoveDir> + '_ {
        self.presses.iter().filter_map(|c| move_dir(*c))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.presses.iter().any(|c| codes.contains(c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
