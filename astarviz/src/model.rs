//! Elm-architecture Model implementation.

use std::fmt;
use std::thread;

use astarviz_core::{
    AttrMask, Canvas, Effect, Glyph, Key, Model, MouseAction, Msg, Point, Range, Screen, Style,
};
use astarviz_paths::{CellId, Grid, MazeGen, Role, Step};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::colors::*;
use crate::config::VisualizerConfig;

/// Terminal columns per cell.
pub const CELL_COLS: i32 = 2;
/// Terminal rows per cell.
pub const CELL_ROWS: i32 = 1;
/// Top-left corner of the board on screen; row 0 holds the title.
pub const BOARD_ORIGIN: Point = Point::new(0, 1);

const MIN_WIDTH: i32 = 48;
const TITLE: &str = "A* pathfinding";
const HINTS: &str = "space run  c clear  r reset  g maze  q quit";

/// A blank `size × size` board laid out for the terminal.
pub fn blank_grid(size: usize) -> Grid {
    Grid::new(size, size as i32 * CELL_COLS).0
}

/// What the next left click places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Start,
    End,
    Barrier,
}

impl Mode {
    /// The mode that fills the first missing endpoint of `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        if grid.find_start().is_none() {
            Self::Start
        } else if grid.find_end().is_none() {
            Self::End
        } else {
            Self::Barrier
        }
    }

    fn role(self) -> Role {
        match self {
            Self::Start => Role::Start,
            Self::End => Role::End,
            Self::Barrier => Role::Barrier,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.role(), f)
    }
}

/// Result of the last search, shown on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Idle,
    Searching,
    /// Path found; the value is its length in moves.
    Found(usize),
    NoPath,
    MissingEndpoints,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Searching => f.write_str("searching..."),
            Self::Found(n) => write!(f, "path found: {n} steps"),
            Self::NoPath => f.write_str("no path"),
            Self::MissingEndpoints => f.write_str("place a start and an end first"),
        }
    }
}

/// The interactive A* visualizer.
pub struct Visualizer {
    grid: Grid,
    mode: Mode,
    outcome: Outcome,
    /// Set after a search; edits are ignored until `c` or `r`.
    locked: bool,
    mapgen: MazeGen<StdRng>,
    config: VisualizerConfig,
}

impl Visualizer {
    /// Build the visualizer around an initial board, which may already hold
    /// a loaded maze.
    pub fn new(config: VisualizerConfig, grid: Grid) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            mode: Mode::for_grid(&grid),
            grid,
            outcome: Outcome::Idle,
            locked: false,
            mapgen: MazeGen::new(rng),
            config,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Screen size needed for the board and the lines around it.
    pub fn screen_size(&self) -> (i32, i32) {
        let size = self.config.size as i32;
        ((size * CELL_COLS).max(MIN_WIDTH), size * CELL_ROWS + 3)
    }

    fn board(&self) -> Range {
        let side = self.grid.size() as i32;
        Range::new(
            BOARD_ORIGIN.x,
            BOARD_ORIGIN.y,
            BOARD_ORIGIN.x + side * CELL_COLS,
            BOARD_ORIGIN.y + side * CELL_ROWS,
        )
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key, canvas: &mut dyn Canvas) -> Option<Effect> {
        match key {
            Key::Space => self.run_search(canvas),
            Key::Char('c') => {
                self.grid.reset_search();
                self.locked = false;
                self.outcome = Outcome::Idle;
            }
            Key::Char('r') => self.reset(),
            Key::Char('g') => self.generate_maze(),
            Key::Char('q') | Key::Escape => return Some(Effect::End),
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point) {
        if self.locked {
            return;
        }
        let Some(id) = pick(&self.grid, pos) else {
            return;
        };
        match action {
            MouseAction::Main | MouseAction::DragMain => self.place(id),
            MouseAction::Secondary | MouseAction::DragSecondary => self.erase(id),
            _ => {}
        }
    }

    fn place(&mut self, id: CellId) {
        let cell = &self.grid[id];
        if cell.role() != Role::Empty {
            return;
        }
        let (row, col) = (cell.row(), cell.col());
        let role = self.mode.role();
        match self.grid.set_role(row, col, role) {
            Ok(()) => {
                debug!("placed {role} at ({row}, {col})");
                self.mode = Mode::for_grid(&self.grid);
            }
            Err(e) => debug!("click ignored: {e}"),
        }
    }

    fn erase(&mut self, id: CellId) {
        let cell = &self.grid[id];
        let (row, col) = (cell.row(), cell.col());
        match self.grid.clear_role(row, col) {
            Ok(Role::Empty) => {}
            Ok(role) => {
                debug!("cleared {role} at ({row}, {col})");
                self.mode = Mode::for_grid(&self.grid);
            }
            Err(e) => debug!("click ignored: {e}"),
        }
    }

    /// Run A* on the current board, animating every step.
    fn run_search(&mut self, canvas: &mut dyn Canvas) {
        let delay = self.config.step_delay;
        let mode = self.mode;
        let mut frames = 0usize;

        let result = {
            let mut observer = |grid: &Grid, _step: Step| {
                canvas.present(&mut |screen: &mut Screen| {
                    draw_view(grid, mode, Outcome::Searching, true, screen)
                });
                frames += 1;
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            };
            self.grid.search(&mut observer)
        };

        match result {
            Ok(found) => {
                self.outcome = match self.grid.find_end() {
                    Some(end) if found => Outcome::Found(self.grid.path_len(end)),
                    _ => Outcome::NoPath,
                };
                self.locked = true;
                debug!("search animated in {frames} frames");
            }
            Err(e) => {
                info!("search not started: {e}");
                self.outcome = Outcome::MissingEndpoints;
            }
        }
    }

    fn reset(&mut self) {
        self.grid = blank_grid(self.config.size);
        self.mode = Mode::Start;
        self.outcome = Outcome::Idle;
        self.locked = false;
    }

    /// Replace the board with a freshly generated maze.
    pub fn generate_maze(&mut self) {
        let maze = self.mapgen.generate(self.config.size);
        if let Err(e) = self.grid.apply_maze(&maze) {
            warn!("generated maze rejected: {e}");
            return;
        }
        self.mode = Mode::for_grid(&self.grid);
        self.outcome = Outcome::Idle;
        self.locked = false;
    }
}

impl Model for Visualizer {
    fn update(&mut self, msg: Msg, canvas: &mut dyn Canvas) -> Option<Effect> {
        match self.board().rel_msg(msg) {
            Msg::KeyDown { key, .. } => self.handle_key(key, canvas),
            Msg::Mouse { action, pos, .. } => {
                self.handle_mouse(action, pos);
                None
            }
            _ => None,
        }
    }

    fn draw(&self, screen: &mut Screen) {
        draw_view(&self.grid, self.mode, self.outcome, self.locked, screen);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Map a board-relative terminal position to the cell under it.
pub fn pick(grid: &Grid, pos: Point) -> Option<CellId> {
    if pos.x < 0 || pos.y < 0 {
        return None;
    }
    let world = Point::new(pos.x, pos.y * grid.cell_width() / CELL_ROWS);
    grid.locate(world)
}

/// Paint every cell of `grid` as a coloured block with its top-left corner
/// at `origin`.
pub fn render(grid: &Grid, screen: &mut Screen, origin: Point) {
    let cw = grid.cell_width();
    for (_, cell) in grid.iter() {
        let p = cell.position();
        let top_left = origin + Point::new(p.x * CELL_COLS / cw, p.y * CELL_ROWS / cw);
        let glyph = Glyph::default().with_style(Style::default().with_bg(cell_color(cell)));
        for dy in 0..CELL_ROWS {
            for dx in 0..CELL_COLS {
                screen.set(top_left.shift(dx, dy), glyph);
            }
        }
    }
}

fn draw_view(grid: &Grid, mode: Mode, outcome: Outcome, locked: bool, screen: &mut Screen) {
    screen.fill(Glyph::default());
    screen.text(
        Point::ZERO,
        TITLE,
        Style::default().with_attrs(AttrMask::BOLD),
    );
    render(grid, screen, BOARD_ORIGIN);

    let y = BOARD_ORIGIN.y + grid.size() as i32 * CELL_ROWS;
    let placing = if locked {
        "placing: locked (c to edit)".to_string()
    } else {
        format!("placing: {mode}")
    };
    let n = screen.text(Point::new(0, y), &placing, Style::default().with_fg(FG));
    let fg = match outcome {
        Outcome::Found(_) => FG_OK,
        Outcome::NoPath | Outcome::MissingEndpoints => FG_WARN,
        _ => FG,
    };
    screen.text(
        Point::new(n as i32 + 2, y),
        &outcome.to_string(),
        Style::default().with_fg(fg),
    );
    screen.text(Point::new(0, y + 1), HINTS, Style::default().with_fg(FG_DIM));
}
