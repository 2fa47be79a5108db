/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only ever reads `&World`. One grid cell of the canvas is
/// drawn as two terminal columns, so the default 750×650 canvas needs a
/// 60×26 map area plus the HUD, message and help rows.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Point, Wall};
use crate::domain::grid::Cell as GridCell;
use crate::sim::world::{Phase, Terminal, World};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every "empty" terminal cell, also used
    /// for `Clear`, so row gaps never show the terminal's own default.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer: differs from any real
    /// cell, so every position is diffed on the next frame.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    #[inline]
    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg: Self::norm_bg(bg) }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Canvas → screen mapping ──

/// Terminal columns per grid cell.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const WALL_BG: Color = Color::Rgb { r: 139, g: 69, b: 19 };
const GOAL_BG: Color = Color::Rgb { r: 30, g: 140, b: 50 };
const FLAME: Color = Color::Rgb { r: 255, g: 140, b: 0 };
const DIAMOND: Color = Color::Rgb { r: 80, g: 140, b: 255 };
const MONSTER: Color = Color::Rgb { r: 255, g: 60, b: 60 };
const PLAYER: Color = Color::Rgb { r: 255, g: 230, b: 80 };

/// Visible map size in grid cells: the canvas, capped to the grid.
fn map_dims(world: &World) -> (usize, usize) {
    let grid = world.maze.grid();
    let size = grid.cell_size().max(1) as f32;
    let cols = (world.config.arena.width / size).ceil() as usize;
    let rows = (world.config.arena.height / size).ceil() as usize;
    (cols.min(grid.cols()), rows.min(grid.rows()))
}

/// Cells covered by a wall as drawn, i.e. with its rotation applied around
/// the rect center. Samples the rect on a sub-cell lattice.
fn wall_footprint(wall: &Wall, cell_size: f32, cols: usize, rows: usize) -> Vec<GridCell> {
    let r = &wall.rect;
    if r.width <= 0.0 || r.height <= 0.0 || cell_size <= 0.0 {
        return vec![];
    }
    let c = r.center();
    let (sin, cos) = wall.rotation.to_radians().sin_cos();
    let max_step = cell_size / 4.0;
    let nx = (r.width / max_step).ceil().max(1.0) as usize;
    let ny = (r.height / max_step).ceil().max(1.0) as usize;
    let (sx, sy) = (r.width / nx as f32, r.height / ny as f32);

    let mut out = Vec::new();
    for i in 0..nx {
        for j in 0..ny {
            let lx = r.x + (i as f32 + 0.5) * sx - c.x;
            let ly = r.y + (j as f32 + 0.5) * sy - c.y;
            let px = lx * cos - ly * sin + c.x;
            let py = lx * sin + ly * cos + c.y;
            if px < 0.0 || py < 0.0 {
                continue;
            }
            let cell = GridCell::new((px / cell_size) as usize, (py / cell_size) as usize);
            if cell.col < cols && cell.row < rows {
                out.push(cell);
            }
        }
    }
    out.sort();
    out.dedup();
    out
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<(Phase, Terminal)>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &World) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Screen change → clear for a clean transition
        let screen = (world.phase, world.state.terminal);
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();

        match world.phase {
            Phase::Title => self.compose_title(world),
            Phase::Playing => {
                self.compose_game(world);
                match world.state.terminal {
                    Terminal::None => {}
                    Terminal::Won => self.compose_banner(
                        world,
                        "GOAL REACHED!",
                        &format!("Final Score: {}", world.state.score),
                        GOAL_BG,
                    ),
                    Terminal::Lost => self.compose_banner(
                        world,
                        "YOU LOST",
                        "Score reset to 0",
                        MONSTER,
                    ),
                }
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Never ResetColor here: the terminal default may differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_game(&mut self, w: &World) {
        let (cols, rows) = map_dims(w);
        let s = &w.state;

        // HUD
        let hud = format!(
            " MAZE CHASE   Score: {:<4} Diamonds left: {:<3} Seed: {}",
            s.score,
            s.diamonds.len(),
            w.seed,
        );
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

        // Floor
        for row in 0..rows {
            for col in 0..cols {
                self.put_glyph(col, row, ['·', ' '], Color::Rgb { r: 50, g: 50, b: 70 }, Color::Reset);
            }
        }

        // Walls, as drawn (rotated)
        let size = w.maze.grid().cell_size() as f32;
        for wall in w.maze.walls() {
            for c in wall_footprint(wall, size, cols, rows) {
                self.put_glyph(c.col, c.row, [' ', ' '], Color::White, WALL_BG);
            }
        }

        // Entities, back to front
        self.put_entity(w, s.goal, ['(', ')'], Color::White, GOAL_BG);
        for d in &s.diamonds {
            self.put_entity(w, d.pos, ['◆', ' '], DIAMOND, Color::Reset);
        }
        for o in &s.obstacles {
            self.put_entity(w, o.center, ['▲', ' '], FLAME, Color::Reset);
        }
        self.put_entity(w, s.monster, ['M', 'M'], MONSTER, Color::Reset);
        self.put_entity(w, s.player, ['@', ' '], PLAYER, Color::Reset);

        // Message bar
        let msg_row = MAP_ROW + rows + 1;
        if !s.message.is_empty() {
            self.front.fill_row(msg_row, MSG_BG);
            self.front.put_str(0, msg_row, &format!(" ◆ {} ", s.message), Color::Black, MSG_BG);
        }

        // Help bar
        let help = " ←↑↓→ / WASD: Move   ESC: Title   Q: Quit";
        self.front.put_str(0, msg_row + 2, help, Color::DarkGrey, Color::Reset);
    }

    fn put_glyph(&mut self, col: usize, row: usize, glyph: [char; 2], fg: Color, bg: Color) {
        let x = col * CELL_W;
        let y = MAP_ROW + row;
        self.front.set(x, y, Cell::new(glyph[0], fg, bg));
        self.front.set(x + 1, y, Cell::new(glyph[1], fg, bg));
    }

    fn put_entity(&mut self, w: &World, p: Point, glyph: [char; 2], fg: Color, bg: Color) {
        let (cols, rows) = map_dims(w);
        let c = w.maze.grid().cell_at(p);
        if c.col < cols && c.row < rows {
            self.put_glyph(c.col, c.row, glyph, fg, bg);
        }
    }

    /// Centered box over the map with a headline and a detail line.
    fn compose_banner(&mut self, w: &World, headline: &str, detail: &str, accent: Color) {
        let (cols, rows) = map_dims(w);
        let view_w = cols * CELL_W;
        let box_w = 34_usize.min(view_w);
        let box_h = 7_usize.min(rows);
        let box_x = view_w.saturating_sub(box_w) / 2;
        let box_y = MAP_ROW + rows.saturating_sub(box_h) / 2;
        let dim = Color::Rgb { r: 40, g: 40, b: 40 };

        for y in box_y..box_y + box_h {
            for x in box_x..box_x + box_w {
                self.front.set(x, y, Cell::new(' ', Color::White, dim));
            }
        }

        let center = |s: &str| box_x + box_w.saturating_sub(s.chars().count()) / 2;
        self.front.put_str(center(headline), box_y + 1, headline, accent, dim);
        self.front.put_str(center(detail), box_y + 2, detail, Color::White, dim);
        let again = "ENTER: Play again";
        let back = "ESC: Title";
        self.front.put_str(center(again), box_y + 4, again, Color::Rgb { r: 80, g: 255, b: 80 }, dim);
        self.front.put_str(center(back), box_y + 5, back, Color::DarkGrey, dim);
    }

    fn compose_title(&mut self, w: &World) {
        let title = [
            r" __  __                  ___ _                    ",
            r"|  \/  |__ _ ______ ___ / __| |_  __ _ ___ ___    ",
            r"| |\/| / _` |_ / -_)___| (__| ' \/ _` (_-</ -_)   ",
            r"|_|  |_\__,_/__\___|    \___|_||_\__,_/__/\___|   ",
        ];
        for (i, line) in title.iter().enumerate() {
            self.front.put_str(2, 2 + i, line, Color::Rgb { r: 255, g: 200, b: 50 }, Color::Reset);
        }

        let hi = Color::Rgb { r: 80, g: 255, b: 80 };
        self.front.put_str(6, 8, "Reach the green goal. Grab diamonds on the way.", Color::White, Color::Reset);
        self.front.put_str(6, 9, "Flames and the monster send you back to the start.", Color::White, Color::Reset);

        self.front.put_str(8, 12, "ENTER   Start", hi, Color::Reset);
        self.front.put_str(8, 13, "  Q     Quit", Color::White, Color::Reset);

        let controls = [
            "Controls",
            "  ←↑↓→ / WASD   Move",
            "  ESC           Back to title",
        ];
        for (i, line) in controls.iter().enumerate() {
            let color = if i == 0 { Color::Rgb { r: 255, g: 200, b: 50 } } else { Color::White };
            self.front.put_str(8, 15 + i, line, color, Color::Reset);
        }

        let info = format!(
            "{} walls   {} diamonds   {} flames   seed {}",
            w.maze.walls().len(),
            w.config.balance.diamond_count,
            w.config.balance.obstacle_count,
            w.seed,
        );
        self.front.put_str(8, 19, &info, Color::DarkGrey, Color::Reset);
    }
}
